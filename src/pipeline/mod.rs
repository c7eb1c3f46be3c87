//! # Stage Orchestrator
//!
//! Runs the pipeline as a fixed, ordered list of stages:
//!
//! ```text
//! 1 extract -> 2 coverage_check? -> 3 convert -> 4 validate? -> 5 end_to_end? -> 6 export?
//! ```
//!
//! Stages marked `?` are optional; when disabled they are logged as skipped
//! and count as passed. Each stage is an isolated unit that only sees
//! filesystem paths and returns a typed [`StageOutcome`]. The first failed
//! stage halts the run. On every exit path a [`RunReport`] is written to
//! `<log_dir>/results_<timestamp>.json`.
//!
//! ## Files written to the log directory
//!
//! - `orchestrate_<timestamp>.log`: main log
//! - `step<N>_<stage>_<timestamp>.log`: one per attempted stage
//! - `results_<timestamp>.json`: the run report
//!
//! The log files are diagnostics only; success is decided by the values the
//! stages return.

mod report;
mod run_log;
mod stages;

#[cfg(test)]
mod tests;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::PipelineConfig;
use crate::convert::{discover_extracted, ConvertError};
use crate::decoder::ArchiveDecoder;
use crate::extract::select_inputs;
use crate::layout::ArchiveLayout;

pub use report::{RunReport, StageRecord};
pub use run_log::RunLog;
pub use stages::{
    ConvertStage, CoverageCheckStage, EndToEndStage, ExportStage, ExtractStage, ValidateStage,
};

const RULE: &str = "================================================================================";

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    /// Unpack and decode archives into intermediate models
    Extract,
    /// Check every archive produced complete outputs
    CoverageCheck,
    /// Map intermediate models to IDS documents
    Convert,
    /// Round-trip verification and schema validation
    Validate,
    /// Check outputs are complete and consistent end to end
    EndToEnd,
    /// Write CSV exports
    Export,
}

impl StageKind {
    /// All stages in canonical order
    pub const ALL: [StageKind; 6] = [
        StageKind::Extract,
        StageKind::CoverageCheck,
        StageKind::Convert,
        StageKind::Validate,
        StageKind::EndToEnd,
        StageKind::Export,
    ];

    /// Stage label used in keys and file names
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Extract => "extract",
            StageKind::CoverageCheck => "coverage_check",
            StageKind::Convert => "convert",
            StageKind::Validate => "validate",
            StageKind::EndToEnd => "end_to_end",
            StageKind::Export => "export",
        }
    }

    /// 1-based position in the pipeline
    pub fn ordinal(self) -> usize {
        match self {
            StageKind::Extract => 1,
            StageKind::CoverageCheck => 2,
            StageKind::Convert => 3,
            StageKind::Validate => 4,
            StageKind::EndToEnd => 5,
            StageKind::Export => 6,
        }
    }

    /// Heading for the main log
    pub fn title(self) -> &'static str {
        match self {
            StageKind::Extract => "Extract Archives",
            StageKind::CoverageCheck => "Check Extraction Coverage",
            StageKind::Convert => "Convert to IDS",
            StageKind::Validate => "Validate IDS Conversions",
            StageKind::EndToEnd => "End-to-End Check",
            StageKind::Export => "Export CSV",
        }
    }

    /// Whether configuration may disable this stage
    pub fn is_optional(self) -> bool {
        !matches!(self, StageKind::Extract | StageKind::Convert)
    }

    /// Key in [`RunReport::steps`], e.g. `3_convert`
    pub fn report_key(self) -> String {
        format!("{}_{}", self.ordinal(), self.label())
    }

    /// Per-stage log file name
    pub fn log_file_name(self, timestamp: &str) -> String {
        format!("step{}_{}_{}.log", self.ordinal(), self.label(), timestamp)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Abnormal termination of a stage
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Conversion could not start
    #[error(transparent)]
    ConvertError(#[from] ConvertError),

    /// Any other failure
    #[error("{0}")]
    Failed(String),
}

/// Errors of the orchestrator itself (not of a stage)
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Run report serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Refusing to clean a path that is not a dedicated output directory
    #[error("Refusing to clean {}", .0.display())]
    UnsafeClean(PathBuf),
}

/// What a stage reports back
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageOutcome {
    pub success: bool,
    pub files: Option<usize>,
    pub issues: Vec<String>,
}

impl StageOutcome {
    pub fn succeeded(files: Option<usize>) -> Self {
        Self {
            success: true,
            files,
            issues: Vec::new(),
        }
    }

    pub fn failed(files: Option<usize>, issues: Vec<String>) -> Self {
        Self {
            success: false,
            files,
            issues,
        }
    }

    /// Success exactly when there are no issues
    pub fn from_issues(files: Option<usize>, issues: Vec<String>) -> Self {
        Self {
            success: issues.is_empty(),
            files,
            issues,
        }
    }
}

/// Everything a stage may look at
pub struct StageContext<'a> {
    /// Resolved settings
    pub config: &'a PipelineConfig,
    /// Selected input archives, sorted
    pub inputs: &'a [PathBuf],
    /// This stage's log
    pub log: &'a RunLog,
}

impl StageContext<'_> {
    /// Output layouts this run cares about: one per selected input, or every
    /// extracted model under the output directory when nothing was selected
    pub fn layouts(&self) -> std::io::Result<Vec<ArchiveLayout>> {
        if !self.inputs.is_empty() {
            return Ok(self
                .inputs
                .iter()
                .map(|input| ArchiveLayout::for_archive(input, &self.config.output_dir))
                .collect());
        }

        Ok(discover_extracted(&self.config.output_dir)?
            .iter()
            .filter_map(|path| ArchiveLayout::from_extracted(path))
            .collect())
    }
}

/// One pipeline stage
pub trait Stage {
    /// Which stage this is
    fn kind(&self) -> StageKind;

    /// Run to completion. `Ok` with a failed outcome and `Err` both halt the
    /// pipeline; `Err` is for when the stage could not do its work at all.
    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError>;
}

/// Sequences stages with fail-fast semantics
pub struct Orchestrator {
    config: PipelineConfig,
    stages: Vec<Box<dyn Stage>>,
    timestamp: String,
}

impl Orchestrator {
    /// Orchestrator over custom stages, run in the given order
    pub fn new(config: PipelineConfig, stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            config,
            stages,
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// The six production stages
    pub fn standard(config: PipelineConfig, decoder: Box<dyn ArchiveDecoder>) -> Self {
        Self::new(
            config,
            vec![
                Box::new(ExtractStage::new(decoder)),
                Box::new(CoverageCheckStage),
                Box::new(ConvertStage),
                Box::new(ValidateStage),
                Box::new(EndToEndStage),
                Box::new(ExportStage),
            ],
        )
    }

    /// Override the run timestamp used in file names
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Whether `kind` runs under the current configuration
    pub fn is_enabled(&self, kind: StageKind) -> bool {
        match kind {
            StageKind::Extract | StageKind::Convert => true,
            StageKind::CoverageCheck => self.config.check_extraction,
            StageKind::Validate => self.config.check_conversion,
            StageKind::EndToEnd => self.config.check_end_to_end,
            StageKind::Export => self.config.export_csv,
        }
    }

    /// Execute the pipeline.
    ///
    /// Stage failures are reported through [`RunReport::success`]; `Err` is
    /// returned only when the orchestrator cannot set up or persist its
    /// own files.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let config = &self.config;
        fs::create_dir_all(&config.log_dir)?;
        let main = RunLog::append_to(
            config
                .log_dir
                .join(format!("orchestrate_{}.log", self.timestamp)),
        );

        main.info(RULE);
        main.info("Chromatography to IDS Pipeline");
        main.info(RULE);
        main.info(format!("Data directory: {}", config.data_dir.display()));
        main.info(format!("Output directory: {}", config.output_dir.display()));
        main.info(format!("Log directory: {}", config.log_dir.display()));
        main.info(format!("Schema version: {}", config.mapper.schema_version));

        if config.clean {
            self.clean(&main)?;
        }

        let inputs = select_inputs(&config.data_dir, &config.process_files, &config.input_extension)?;
        let mut report = RunReport::new(&self.timestamp);
        report.files_processed = inputs
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        for stage in &self.stages {
            let kind = stage.kind();
            if !self.is_enabled(kind) {
                main.info(format!("Step {}: {} skipped (disabled)", kind.ordinal(), kind.title()));
                continue;
            }

            main.info(RULE);
            main.info(format!("STEP {}: {}", kind.ordinal(), kind.title()));
            main.info(RULE);

            let log_path = config.log_dir.join(kind.log_file_name(&self.timestamp));
            let stage_log = RunLog::create(&log_path)?;
            let ctx = StageContext {
                config,
                inputs: &inputs,
                log: &stage_log,
            };

            let outcome = match stage.run(&ctx) {
                Ok(outcome) => outcome,
                Err(e) => {
                    stage_log.error(e.to_string());
                    StageOutcome::failed(None, vec![e.to_string()])
                }
            };
            report.record(kind, &outcome, &log_path);

            if outcome.success {
                main.info(format!("✓ {} completed successfully", kind));
                continue;
            }

            main.error(format!("✗ {} failed", kind));
            for issue in &outcome.issues {
                main.error(format!("  - {}", issue));
            }
            main.error(format!("See log: {}", log_path.display()));
            main.error(format!("✗ Pipeline failed at {}", kind));
            report.success = false;
            self.finish(&report, &main)?;
            return Ok(report);
        }

        report.success = true;
        self.finish(&report, &main)?;
        Ok(report)
    }

    /// Remove previous outputs and logs. Destructive; only runs when
    /// `clean` is set.
    fn clean(&self, main: &RunLog) -> Result<(), PipelineError> {
        main.info("Cleaning output directories...");
        for dir in [&self.config.output_dir, &self.config.log_dir] {
            ensure_cleanable(dir)?;
            if dir.exists() {
                main.info(format!("  Removing {}", dir.display()));
                fs::remove_dir_all(dir)?;
            }
        }
        fs::create_dir_all(&self.config.log_dir)?;
        main.info("✓ Clean complete");
        Ok(())
    }

    fn finish(&self, report: &RunReport, main: &RunLog) -> Result<(), PipelineError> {
        let path = report.save(&self.config.log_dir)?;
        main.info(format!("Results saved to: {}", path.display()));

        main.info(RULE);
        main.info("PIPELINE SUMMARY");
        main.info(RULE);
        main.info(format!("Timestamp: {}", report.timestamp));
        main.info(format!("Files processed: {}", report.files_processed.len()));
        for name in &report.files_processed {
            main.info(format!("  - {}", name));
        }
        main.info("Steps executed:");
        for (key, record) in &report.steps {
            let status = if record.success { "✓" } else { "✗" };
            main.info(format!("  {} {}", status, key));
        }
        if report.success {
            main.info("✓ PIPELINE COMPLETED SUCCESSFULLY");
        } else {
            main.error("✗ PIPELINE FAILED");
        }
        Ok(())
    }
}

/// Never deletes a filesystem root or the working directory
fn ensure_cleanable(dir: &Path) -> Result<(), PipelineError> {
    let unsafe_path = dir.as_os_str().is_empty()
        || dir == Path::new(".")
        || dir == Path::new("..")
        || dir.parent().is_none();
    if unsafe_path {
        return Err(PipelineError::UnsafeClean(dir.to_path_buf()));
    }
    Ok(())
}
