use serde::{Deserialize, Serialize};

use super::ModelError;

/// File-level provenance produced by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Archive file name the model was decoded from
    pub source_file: String,

    /// When the decoder ran (ISO 8601, passed through verbatim)
    pub extraction_timestamp: String,

    /// Decoder name (e.g., "pycorn")
    pub decoder: Option<String>,

    /// Decoder version tag
    pub decoder_version: Option<String>,

    /// Run date reported by the instrument
    pub run_date: Option<String>,

    /// Number of raw files found in the archive
    pub raw_files_count: Option<usize>,
}

impl FileMetadata {
    /// Create metadata with the two required fields.
    ///
    /// Empty strings count as missing.
    pub fn new(
        source_file: impl Into<String>,
        extraction_timestamp: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let source_file = source_file.into();
        let extraction_timestamp = extraction_timestamp.into();

        if source_file.trim().is_empty() {
            return Err(ModelError::missing("metadata.source_file"));
        }
        if extraction_timestamp.trim().is_empty() {
            return Err(ModelError::missing("metadata.extraction_timestamp"));
        }

        Ok(Self {
            source_file,
            extraction_timestamp,
            decoder: None,
            decoder_version: None,
            run_date: None,
            raw_files_count: None,
        })
    }

    /// Set the decoder identity
    pub fn with_decoder(mut self, name: impl Into<String>, version: Option<String>) -> Self {
        self.decoder = Some(name.into());
        self.decoder_version = version;
        self
    }

    /// Set the instrument-reported run date
    pub fn with_run_date(mut self, run_date: impl Into<String>) -> Self {
        self.run_date = Some(run_date.into());
        self
    }

    /// Decoder identity string, e.g. `pycorn-0.20`.
    ///
    /// Falls back to `unknown` for whichever half is absent.
    pub fn decoder_identity(&self) -> String {
        format!(
            "{}-{}",
            self.decoder.as_deref().unwrap_or("unknown"),
            self.decoder_version.as_deref().unwrap_or("unknown")
        )
    }
}
