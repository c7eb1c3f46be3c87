//! # Intermediate Model
//!
//! Typed records for what an archive decoder hands over: named curves
//! (x, y samples), named event groups (position + description pairs) and
//! file-level metadata. The model is created once per archive and is
//! read-only afterwards.
//!
//! ## On-disk form
//!
//! ```json
//! {
//!   "metadata": { "source_file": "run.zip", "extraction_timestamp": "2024-05-01T10:00:00" },
//!   "curves": [ { "id": "UV 1_280", "label": "UV 1_280", "data_type": "UV",
//!                 "unit": "mAU", "data": [[0.0, 0.01], [1.0, 0.02]] } ],
//!   "events": [ { "id": "Fractions", "label": "Fraction Start", "data": [[1.5, "tube A1"]] } ]
//! }
//! ```
//!
//! Loading goes through a loosely-typed raw form first so that a missing
//! required key is reported by name ([`ModelError::MissingKey`]) instead of
//! as a generic parse failure.

mod curve;
mod error;
mod event;
mod json_number;
mod metadata;
mod summary;


use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ids::curve_id_for;

pub use curve::{CurveGroup, CurveKind, Point};
pub use error::ModelError;
pub use event::{EventEntry, EventGroup};
pub use json_number::{number, optional_number, optional_point, points, JsonNumber};
pub use metadata::FileMetadata;
pub use summary::{CurveSummary, EventSummary, ModelSummary};

/// Decoder output for one archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateModel {
    /// File-level provenance
    pub metadata: FileMetadata,
    /// Curve groups in decoder order
    pub curves: Vec<CurveGroup>,
    /// Event groups in decoder order
    pub events: Vec<EventGroup>,
}

impl IntermediateModel {
    /// Assemble a model, enforcing unique curve identifiers.
    ///
    /// Identifiers must also stay distinct after the IDS curve-id transform,
    /// since that derived id is how a curve is found again in the document.
    pub fn new(
        metadata: FileMetadata,
        curves: Vec<CurveGroup>,
        events: Vec<EventGroup>,
    ) -> Result<Self, ModelError> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(curves.len());
        for curve in &curves {
            let derived = curve_id_for(&curve.id);
            match seen.get(derived.as_str()) {
                Some(&first) if first == curve.id => {
                    return Err(ModelError::DuplicateCurveId(curve.id.clone()));
                }
                Some(&first) => {
                    return Err(ModelError::CurveIdCollision {
                        first: first.to_string(),
                        second: curve.id.clone(),
                        curve_id: derived,
                    });
                }
                None => {
                    seen.insert(derived, curve.id.as_str());
                }
            }
        }

        Ok(Self {
            metadata,
            curves,
            events,
        })
    }

    /// Parse and validate a model from JSON text
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let raw: RawModel = serde_json::from_str(json)?;
        raw.into_model()
    }

    /// Load and validate a model from a `<base>_extracted.json` file
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of curves
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Total number of event entries across all groups
    pub fn event_count(&self) -> usize {
        self.events.iter().map(EventGroup::len).sum()
    }

    /// Summary without bulk arrays
    pub fn summary(&self) -> ModelSummary {
        ModelSummary::from(self)
    }
}

#[derive(Deserialize)]
struct RawModel {
    metadata: Option<RawMetadata>,
    #[serde(default)]
    curves: Vec<RawCurve>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
struct RawMetadata {
    source_file: Option<String>,
    extraction_timestamp: Option<String>,
    decoder: Option<String>,
    decoder_version: Option<String>,
    run_date: Option<String>,
    raw_files_count: Option<usize>,
}

#[derive(Deserialize)]
struct RawCurve {
    id: Option<String>,
    label: Option<String>,
    data_type: Option<String>,
    unit: Option<String>,
    run_name: Option<String>,
    #[serde(default, with = "points")]
    data: Vec<Point>,
}

#[derive(Deserialize)]
struct RawEvent {
    id: Option<String>,
    label: Option<String>,
    #[serde(default)]
    data: Vec<EventEntry>,
}

impl RawModel {
    fn into_model(self) -> Result<IntermediateModel, ModelError> {
        let raw_meta = self.metadata.ok_or_else(|| ModelError::missing("metadata"))?;
        let mut metadata = FileMetadata::new(
            raw_meta.source_file.unwrap_or_default(),
            raw_meta.extraction_timestamp.unwrap_or_default(),
        )?;
        metadata.decoder = raw_meta.decoder;
        metadata.decoder_version = raw_meta.decoder_version;
        metadata.run_date = raw_meta.run_date;
        metadata.raw_files_count = raw_meta.raw_files_count;

        let mut curves = Vec::with_capacity(self.curves.len());
        for (i, raw) in self.curves.into_iter().enumerate() {
            let id = raw
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ModelError::missing(format!("curves[{i}].id")))?;
            let data_type = raw
                .data_type
                .ok_or_else(|| ModelError::missing(format!("curves[{i}].data_type")))?;
            let label = raw.label.unwrap_or_else(|| id.clone());

            let mut curve =
                CurveGroup::new(id, label, data_type, raw.unit.unwrap_or_default(), raw.data)?;
            curve.run_name = raw.run_name;
            curves.push(curve);
        }

        let mut events = Vec::with_capacity(self.events.len());
        for (i, raw) in self.events.into_iter().enumerate() {
            let id = raw
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ModelError::missing(format!("events[{i}].id")))?;
            let label = raw.label.unwrap_or_else(|| id.clone());
            events.push(EventGroup::new(id, label, raw.data)?);
        }

        IntermediateModel::new(metadata, curves, events)
    }
}
