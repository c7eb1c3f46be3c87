use serde::{Deserialize, Serialize};

/// Provenance block (`metadata`) of an IDS document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Vendor format of the source archive (e.g., "AKTA-UNICORN-6")
    pub source_format: String,
    /// Archive file name
    pub source_file: String,
    /// When the decoder ran, copied from the intermediate model
    pub extraction_timestamp: String,
    /// When the mapper ran (RFC 3339, UTC)
    pub conversion_timestamp: String,
    /// Decoder identity (e.g., "pycorn-0.20")
    pub extraction_tool: String,
}

/// Descriptive run block.
///
/// Every leaf is always serialized; unknown values are `null`, never omitted,
/// so consumers can tell "unknown" from "field absent in this schema".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_timestamp: Option<String>,
    pub run_name: Option<String>,
    pub run_id: Option<String>,
    pub instrument: InstrumentInfo,
    pub column: ColumnInfo,
    pub method: MethodInfo,
    pub sample: SampleInfo,
    pub operator: Option<String>,
    pub notes: Option<String>,
}

/// Instrument identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub software_version: Option<String>,
}

/// Chromatography column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<String>,
    pub volume_ml: Option<f64>,
    pub length_cm: Option<f64>,
    pub diameter_cm: Option<f64>,
}

/// Method that drove the run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
}

/// Injected sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub name: Option<String>,
    pub volume_ml: Option<f64>,
    pub concentration: Option<String>,
}
