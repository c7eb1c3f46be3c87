//! # IDS Document
//!
//! The versioned Intermediary Data Schema produced by the
//! [`crate::mapper::SchemaMapper`]. Top-level keys are `schema_version`,
//! `metadata`, `run_info` and `data`; the shape of `data` depends on the
//! [`SchemaVersion`]:
//!
//! ```text
//! 1.0.0   data { curves[], events[], peaks[] }
//! 0.9.0   data { sensors[], events[], peaks[], fractions[] }, custom_data {}
//! ```
//!
//! Documents are immutable once written. [`IdsDocument::curves`] and
//! [`IdsDocument::events`] give generation-independent views for the
//! verifier and the CSV exporter.

mod kinds;
mod records;
mod run_info;
mod version;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::model::{CurveKind, Point};

pub use kinds::EventKind;
pub use records::{
    CurveData, CurveMetadata, CurveRecord, EventRecord, IdsData, LegacyEventRecord, Position,
    SensorData, SensorRecord, SplitPosition, XAxis,
};
pub use run_info::{ColumnInfo, InstrumentInfo, MethodInfo, Provenance, RunInfo, SampleInfo};
pub use version::SchemaVersion;

/// Errors reading or writing IDS documents
#[derive(Debug, thiserror::Error)]
pub enum IdsError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Atomic rename of the finished document failed
    #[error("Failed to persist document: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Deterministic curve id: lower-cased, spaces replaced by underscores.
///
/// The verifier recomputes this to re-locate a curve, so it must stay a pure
/// function of the source identifier.
pub fn curve_id_for(identifier: &str) -> String {
    identifier.to_lowercase().replace(' ', "_")
}

/// Event id for the 1-based global index `n`
pub fn event_id_for(n: usize) -> String {
    format!("event_{n:03}")
}

/// A complete IDS document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsDocument {
    /// Semantic version string; consumers must match it exactly
    pub schema_version: String,
    /// Provenance
    pub metadata: Provenance,
    /// Descriptive run block
    pub run_info: RunInfo,
    /// Curves, events and (empty) peaks
    pub data: IdsData,
    /// Free-form extension block of the legacy generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Map<String, Value>>,
}

/// Generation-independent view of one curve record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveView<'a> {
    pub curve_id: &'a str,
    pub kind: CurveKind,
    pub name: &'a str,
    pub unit: &'a str,
    pub x_axis_type: &'a str,
    pub x_axis_unit: &'a str,
    pub wavelength_nm: Option<u32>,
    pub points: &'a [Point],
}

/// Generation-independent view of one event record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventView<'a> {
    pub event_id: &'a str,
    pub kind: EventKind,
    pub name: &'a str,
    /// Position along the x axis; `None` when the legacy volume is null
    pub position: Option<f64>,
    pub position_unit: &'a str,
    pub text: &'a str,
}

impl IdsDocument {
    /// Parsed schema generation, `None` for an unknown version string
    pub fn version(&self) -> Option<SchemaVersion> {
        self.schema_version.parse().ok()
    }

    /// Number of curve records
    pub fn curve_count(&self) -> usize {
        match &self.data {
            IdsData::Curves(data) => data.curves.len(),
            IdsData::Sensors(data) => data.sensors.len(),
        }
    }

    /// Number of event records
    pub fn event_count(&self) -> usize {
        match &self.data {
            IdsData::Curves(data) => data.events.len(),
            IdsData::Sensors(data) => data.events.len(),
        }
    }

    /// Curve records in document order
    pub fn curves(&self) -> Vec<CurveView<'_>> {
        match &self.data {
            IdsData::Curves(data) => data
                .curves
                .iter()
                .map(|c| CurveView {
                    curve_id: &c.curve_id,
                    kind: c.curve_type,
                    name: &c.curve_name,
                    unit: &c.unit,
                    x_axis_type: &c.x_axis.axis_type,
                    x_axis_unit: &c.x_axis.unit,
                    wavelength_nm: c.metadata.as_ref().map(|m| m.wavelength_nm),
                    points: &c.data,
                })
                .collect(),
            IdsData::Sensors(data) => data
                .sensors
                .iter()
                .map(|s| CurveView {
                    curve_id: &s.sensor_id,
                    kind: s.sensor_type,
                    name: &s.sensor_name,
                    unit: &s.unit,
                    x_axis_type: &s.x_axis_type,
                    x_axis_unit: &s.x_axis_unit,
                    wavelength_nm: s.wavelength_nm,
                    points: &s.data_points,
                })
                .collect(),
        }
    }

    /// Event records in document order
    pub fn events(&self) -> Vec<EventView<'_>> {
        match &self.data {
            IdsData::Curves(data) => data
                .events
                .iter()
                .map(|e| EventView {
                    event_id: &e.event_id,
                    kind: e.event_type,
                    name: &e.event_name,
                    position: Some(e.position.value),
                    position_unit: &e.position.unit,
                    text: &e.text,
                })
                .collect(),
            IdsData::Sensors(data) => data
                .events
                .iter()
                .map(|e| EventView {
                    event_id: &e.event_id,
                    kind: e.event_type,
                    name: &e.event_name,
                    position: e.position.volume_ml,
                    position_unit: "ml",
                    text: &e.description,
                })
                .collect(),
        }
    }

    /// First curve whose id equals `curve_id`
    pub fn find_curve(&self, curve_id: &str) -> Option<CurveView<'_>> {
        self.curves().into_iter().find(|c| c.curve_id == curve_id)
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, IdsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a `<base>.ids.json` file
    pub fn from_file(path: &Path) -> Result<Self, IdsError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, IdsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document atomically.
    ///
    /// The JSON goes to a temporary file in the target directory which is then
    /// renamed over `path`, so readers never observe a partial document.
    pub fn save(&self, path: &Path) -> Result<(), IdsError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.persist(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_id_for() {
        assert_eq!(curve_id_for("UV 1_280"), "uv_1_280");
        assert_eq!(curve_id_for("Cond"), "cond");
        assert_eq!(curve_id_for("System pressure"), "system_pressure");
    }

    #[test]
    fn test_event_id_for() {
        assert_eq!(event_id_for(1), "event_001");
        assert_eq!(event_id_for(42), "event_042");
        assert_eq!(event_id_for(1234), "event_1234");
    }

    #[test]
    fn test_untagged_data_shapes() {
        let v1 = r#"{"curves": [], "events": [], "peaks": []}"#;
        let legacy = r#"{"sensors": [], "events": [], "peaks": [], "fractions": []}"#;

        assert!(matches!(
            serde_json::from_str::<IdsData>(v1).unwrap(),
            IdsData::Curves(_)
        ));
        assert!(matches!(
            serde_json::from_str::<IdsData>(legacy).unwrap(),
            IdsData::Sensors(_)
        ));
    }

    #[test]
    fn test_run_info_serializes_nulls() {
        let json = serde_json::to_value(RunInfo::default()).unwrap();

        assert!(json["run_name"].is_null());
        assert!(json["instrument"]["model"].is_null());
        assert!(json["column"]["type"].is_null());
        assert!(json["sample"]["concentration"].is_null());
        // present as null, not omitted
        assert!(json.as_object().unwrap().contains_key("operator"));
    }
}
