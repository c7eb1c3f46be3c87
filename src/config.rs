//! Pipeline configuration.
//!
//! [`PipelineConfig`] is the resolved set of settings handed to the
//! orchestrator; nothing is read from process-wide state. Defaults can come
//! from an optional TOML file where every key is optional:
//!
//! ```toml
//! # chromids.toml
//! [pipeline]
//! data_dir = "data/akta"
//! output_dir = ".tmp/akta_extracted"
//! log_dir = "output/logs"
//! process_files = "all"          # or "none", or "run1.zip, run2.zip"
//! check_end_to_end = false
//! csv_layout = "per-curve"
//!
//! [mapping]
//! schema_version = "1.0.0"
//! source_format = "AKTA-UNICORN-6"
//!
//! [mapping.instrument]
//! manufacturer = "Cytiva"
//! model = "AKTA pure 25"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::export::CsvLayout;
use crate::ids::{InstrumentInfo, SchemaVersion};
use crate::mapper::MapperConfig;

/// Errors loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML is invalid or has a bad value
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Which input archives a run processes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum FileSelection {
    /// Every archive in the data directory (default)
    #[default]
    All,
    /// No archive; later stages work on existing outputs
    Nothing,
    /// Explicit file names inside the data directory
    Named(Vec<String>),
}

impl FromStr for FileSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(FileSelection::All),
            "none" => Ok(FileSelection::Nothing),
            list => {
                let names: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                if names.is_empty() {
                    Err(format!("Invalid file selection '{}': expected all, none or a comma-separated list", s))
                } else {
                    Ok(FileSelection::Named(names))
                }
            }
        }
    }
}

impl TryFrom<String> for FileSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for FileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSelection::All => write!(f, "all"),
            FileSelection::Nothing => write!(f, "none"),
            FileSelection::Named(names) => write!(f, "{}", names.join(",")),
        }
    }
}

/// Resolved settings for one orchestrated run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Where input archives live
    pub data_dir: PathBuf,
    /// Root of the per-archive output directories
    pub output_dir: PathBuf,
    /// Main log, per-stage logs and run reports
    pub log_dir: PathBuf,
    /// Input archives to process
    pub process_files: FileSelection,
    /// Extension of input archives, without the dot
    pub input_extension: String,
    /// Delete `output_dir` and `log_dir` before the run
    pub clean: bool,
    /// Run the extraction coverage check
    pub check_extraction: bool,
    /// Run round-trip and schema validation
    pub check_conversion: bool,
    /// Run the end-to-end check
    pub check_end_to_end: bool,
    /// Run the CSV export
    pub export_csv: bool,
    /// CSV layout for the export stage
    pub csv_layout: CsvLayout,
    /// JSON Schema file; the bundled schema is used when unset
    pub schema_path: Option<PathBuf>,
    /// Mapper settings
    pub mapper: MapperConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/akta"),
            output_dir: PathBuf::from(".tmp/akta_extracted"),
            log_dir: PathBuf::from("output/logs"),
            process_files: FileSelection::All,
            input_extension: "zip".to_string(),
            clean: false,
            check_extraction: true,
            check_conversion: true,
            check_end_to_end: true,
            export_csv: true,
            csv_layout: CsvLayout::Wide,
            schema_path: None,
            mapper: MapperConfig::default(),
        }
    }
}

/// Root of a `chromids.toml` file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Mapper settings
    #[serde(default)]
    pub mapping: MappingSection,
}

/// `[pipeline]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub process_files: Option<FileSelection>,
    pub input_extension: Option<String>,
    pub clean: Option<bool>,
    pub check_extraction: Option<bool>,
    pub check_conversion: Option<bool>,
    pub check_end_to_end: Option<bool>,
    pub export_csv: Option<bool>,
    pub csv_layout: Option<CsvLayout>,
    pub schema_path: Option<PathBuf>,
}

/// `[mapping]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSection {
    pub schema_version: Option<SchemaVersion>,
    pub source_format: Option<String>,
    pub x_axis_type: Option<String>,
    pub x_axis_unit: Option<String>,
    pub instrument: Option<InstrumentInfo>,
}

impl ConfigFile {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay the keys present in this file onto `config`
    pub fn apply(self, config: &mut PipelineConfig) {
        let p = self.pipeline;
        if let Some(v) = p.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = p.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = p.log_dir {
            config.log_dir = v;
        }
        if let Some(v) = p.process_files {
            config.process_files = v;
        }
        if let Some(v) = p.input_extension {
            config.input_extension = v.trim_start_matches('.').to_string();
        }
        if let Some(v) = p.clean {
            config.clean = v;
        }
        if let Some(v) = p.check_extraction {
            config.check_extraction = v;
        }
        if let Some(v) = p.check_conversion {
            config.check_conversion = v;
        }
        if let Some(v) = p.check_end_to_end {
            config.check_end_to_end = v;
        }
        if let Some(v) = p.export_csv {
            config.export_csv = v;
        }
        if let Some(v) = p.csv_layout {
            config.csv_layout = v;
        }
        if p.schema_path.is_some() {
            config.schema_path = p.schema_path;
        }

        let m = self.mapping;
        if let Some(v) = m.schema_version {
            config.mapper.schema_version = v;
        }
        if let Some(v) = m.source_format {
            config.mapper.source_format = v;
        }
        if let Some(v) = m.x_axis_type {
            config.mapper.x_axis.axis_type = v;
        }
        if let Some(v) = m.x_axis_unit {
            config.mapper.x_axis.unit = v;
        }
        if let Some(v) = m.instrument {
            config.mapper.instrument = v;
        }
    }
}
