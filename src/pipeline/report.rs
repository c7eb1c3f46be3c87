use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PipelineError, StageKind, StageOutcome};

/// Record of one attempted stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub success: bool,
    /// Files the stage worked on, when it counts files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<usize>,
    /// Per-file problems, empty on success
    #[serde(default)]
    pub issues: Vec<String>,
    /// Stage log file
    pub log_file: String,
}

/// Structured report of one orchestrated run, written as
/// `results_<timestamp>.json`.
///
/// `steps` keys carry the stage ordinal (`1_extract`, `3_convert`, ...), so
/// their sorted order is execution order. Only attempted stages appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub steps: BTreeMap<String, StageRecord>,
    pub files_processed: Vec<String>,
    pub success: bool,
}

impl RunReport {
    pub(crate) fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            steps: BTreeMap::new(),
            files_processed: Vec::new(),
            success: false,
        }
    }

    pub(crate) fn record(&mut self, kind: StageKind, outcome: &StageOutcome, log_file: &Path) {
        self.steps.insert(
            kind.report_key(),
            StageRecord {
                success: outcome.success,
                files: outcome.files,
                issues: outcome.issues.clone(),
                log_file: log_file.display().to_string(),
            },
        );
    }

    /// Record for `kind`, if the stage was attempted
    pub fn stage(&self, kind: StageKind) -> Option<&StageRecord> {
        self.steps.get(&kind.report_key())
    }

    /// Key of the first failed stage
    pub fn failed_stage(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|(_, record)| !record.success)
            .map(|(key, _)| key.as_str())
    }

    /// File name this report is saved under
    pub fn file_name(&self) -> String {
        format!("results_{}.json", self.timestamp)
    }

    /// Write the report into `dir`, returning its path
    pub fn save(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(path)
    }

    /// Load a saved report
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
