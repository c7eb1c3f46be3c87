//! Archive decoder boundary.
//!
//! Decoding a vendor archive into curves and events happens outside this
//! crate. [`ArchiveDecoder`] is the seam a vendor decoder plugs into; its
//! errors are surfaced verbatim, never interpreted.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::model::IntermediateModel;

/// Decoder failure, carrying the archive and the decoder's own message
#[derive(Debug, thiserror::Error)]
#[error("Failed to decode {}: {message}", path.display())]
pub struct DecodeError {
    /// Archive that failed to decode
    pub path: PathBuf,
    /// Decoder message, verbatim
    pub message: String,
}

impl DecodeError {
    /// Wrap any decoder error for `path`
    pub fn new(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Turns one archive into an intermediate model
pub trait ArchiveDecoder {
    /// Decoder name, recorded as `metadata.decoder`
    fn name(&self) -> &str;

    /// Decoder version, recorded as `metadata.decoder_version`
    fn version(&self) -> Option<&str> {
        None
    }

    /// Decode `archive`
    fn decode(&self, archive: &Path) -> Result<IntermediateModel, DecodeError>;
}

/// Decoder for archives that already carry an intermediate model as JSON.
///
/// A ZIP input is searched for the first `.json` entry (by name); any other
/// input is read as the JSON document itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelDecoder;

impl ArchiveDecoder for JsonModelDecoder {
    fn name(&self) -> &str {
        "chromids-json"
    }

    fn version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn decode(&self, archive: &Path) -> Result<IntermediateModel, DecodeError> {
        let json = if is_zip_file(archive) {
            read_json_entry(archive).map_err(|e| DecodeError::new(archive, e))?
        } else {
            std::fs::read_to_string(archive).map_err(|e| DecodeError::new(archive, e))?
        };

        IntermediateModel::from_json(&json).map_err(|e| DecodeError::new(archive, e))
    }
}

fn read_json_entry(archive: &Path) -> Result<String, String> {
    let file = File::open(archive).map_err(|e| e.to_string())?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| e.to_string())?;

    let mut names: Vec<String> = zip
        .file_names()
        .filter(|name| name.ends_with(".json"))
        .map(str::to_string)
        .collect();
    names.sort();
    let name = names
        .into_iter()
        .next()
        .ok_or_else(|| "archive contains no .json entry".to_string())?;

    let mut entry = zip.by_name(&name).map_err(|e| e.to_string())?;
    let mut content = String::new();
    entry.read_to_string(&mut content).map_err(|e| e.to_string())?;
    Ok(content)
}

/// Whether `path` opens as a ZIP archive
pub(crate) fn is_zip_file(path: &Path) -> bool {
    if let Ok(file) = File::open(path) {
        if ZipArchive::new(file).is_ok() {
            return true;
        }
    }
    false
}
