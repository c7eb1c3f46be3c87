//! Conversion: `<base>_extracted.json` in, `<base>.ids.json` out.
//!
//! Batch conversion is best-effort: a file that fails is logged and
//! recorded, and the batch moves on to the next one.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::ids::{IdsDocument, IdsError};
use crate::layout::ArchiveLayout;
use crate::mapper::SchemaMapper;
use crate::model::{IntermediateModel, ModelError};
use crate::validator::{SchemaValidator, ValidationReport};

/// Errors converting one file
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The intermediate model is malformed (missing key, bad JSON, ...)
    #[error("{}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// Writing the IDS document failed
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: IdsError,
    },

    /// I/O error while discovering inputs
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConvertError {
    /// Whether this is the malformed-input case
    pub fn is_malformed(&self) -> bool {
        matches!(self, ConvertError::Malformed { .. })
    }
}

/// Result of converting one file
#[derive(Debug)]
pub struct Converted {
    /// Input intermediate model
    pub extracted: PathBuf,
    /// Written IDS document
    pub output: PathBuf,
    /// Curves written
    pub curves: usize,
    /// Events written
    pub events: usize,
    /// Schema validation report, when a validator was given
    pub validation: Option<ValidationReport>,
}

/// Outcome of a batch conversion
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files converted successfully, in processing order
    pub converted: Vec<Converted>,
    /// Files that failed, with their error
    pub failures: Vec<(PathBuf, ConvertError)>,
}

impl BatchReport {
    /// True when no file failed
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files attempted
    pub fn attempted(&self) -> usize {
        self.converted.len() + self.failures.len()
    }
}

/// Convert one intermediate file into an IDS document at `output`.
///
/// Re-running on the same input overwrites `output` atomically with an
/// equivalent document.
pub fn convert_file(
    extracted: &Path,
    output: &Path,
    mapper: &SchemaMapper,
    validator: Option<&SchemaValidator>,
) -> Result<Converted, ConvertError> {
    let malformed = |source: ModelError| ConvertError::Malformed {
        path: extracted.to_path_buf(),
        source,
    };

    let model = IntermediateModel::from_file(extracted).map_err(malformed)?;
    let doc = mapper.map(&model).map_err(malformed)?;
    let validation = validator.map(|v| v.validate(&doc));

    doc.save(output).map_err(|source| ConvertError::WriteError {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Converted {} -> {} ({} curves, {} events)",
        extracted.display(),
        output.display(),
        doc.curve_count(),
        doc.event_count()
    );

    Ok(Converted {
        extracted: extracted.to_path_buf(),
        output: output.to_path_buf(),
        curves: doc.curve_count(),
        events: doc.event_count(),
        validation,
    })
}

/// `<dir>/*/<base>_extracted.json`, sorted
pub fn discover_extracted(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !root.is_dir() {
        return Ok(found);
    }

    for entry in fs::read_dir(root)? {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        for file in fs::read_dir(&dir)? {
            let path = file?.path();
            if path.is_file() && ArchiveLayout::from_extracted(&path).is_some() {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Convert every extracted model under `root`, writing each document next to
/// its input. Per-file failures are logged and collected.
pub fn convert_batch(
    root: &Path,
    mapper: &SchemaMapper,
    validator: Option<&SchemaValidator>,
) -> Result<BatchReport, ConvertError> {
    let inputs = discover_extracted(root)?;
    let mut report = BatchReport::default();

    for extracted in inputs {
        // discover_extracted only returns names that parse
        let Some(layout) = ArchiveLayout::from_extracted(&extracted) else {
            continue;
        };
        match convert_file(&extracted, &layout.ids_path(), mapper, validator) {
            Ok(converted) => report.converted.push(converted),
            Err(e) => {
                error!("Conversion failed: {}", e);
                report.failures.push((extracted, e));
            }
        }
    }

    info!(
        "Batch conversion: {} converted, {} failed",
        report.converted.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Load an IDS document and its intermediate model side by side
pub(crate) fn load_pair(layout: &ArchiveLayout) -> Result<(IntermediateModel, IdsDocument), String> {
    let model = IntermediateModel::from_file(&layout.extracted_path())
        .map_err(|e| format!("{}: {}", layout.extracted_path().display(), e))?;
    let doc = IdsDocument::from_file(&layout.ids_path())
        .map_err(|e| format!("{}: {}", layout.ids_path().display(), e))?;
    Ok((model, doc))
}
