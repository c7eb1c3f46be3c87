//! # Schema Mapper
//!
//! Deterministic transform from an [`IntermediateModel`] to an
//! [`IdsDocument`]. The mapper has no side effects: it reads its input and
//! returns a new document. Re-running it on the same model yields the same
//! document except for `metadata.conversion_timestamp`.
//!
//! ## Algorithm
//!
//! 1. Start from a skeleton with the configured `schema_version` and every
//!    `run_info` leaf set to null.
//! 2. For each curve: derive `curve_id` ([`curve_id_for`]), map the kind,
//!    parse a UV wavelength from the label (omitted when not found), copy the
//!    points verbatim and attach a sampling-rate hint.
//! 3. For each event entry of each group, in order: assign the next global
//!    `event_NNN` id and classify the group label ([`classify_event`]).
//!
//! Numeric sanity is deliberately not checked here; NaN or infinite values
//! pass through untouched and are flagged by the validator.

mod curves;
mod events;


use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Map;

use crate::ids::{
    curve_id_for, event_id_for, CurveData, CurveMetadata, CurveRecord, EventKind, EventRecord,
    IdsData, IdsDocument, InstrumentInfo, LegacyEventRecord, Position, Provenance, RunInfo, SchemaVersion,
    SensorData, SensorRecord, SplitPosition, XAxis,
};
use crate::model::{CurveGroup, CurveKind, EventEntry, IntermediateModel, ModelError};

pub use curves::{estimate_sampling_rate, parse_wavelength};
pub use events::classify_event;

/// Default vendor format tag written to `metadata.source_format`
pub const DEFAULT_SOURCE_FORMAT: &str = "AKTA-UNICORN-6";

/// Settings that shape the mapper's output
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Target schema generation
    pub schema_version: SchemaVersion,

    /// Vendor format tag for `metadata.source_format`
    pub source_format: String,

    /// X-axis descriptor attached to every curve
    pub x_axis: XAxis,

    /// Instrument identity for `run_info.instrument`; unknown fields stay null
    pub instrument: InstrumentInfo,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            source_format: DEFAULT_SOURCE_FORMAT.to_string(),
            x_axis: XAxis::default(),
            instrument: InstrumentInfo::default(),
        }
    }
}

impl MapperConfig {
    /// Default configuration targeting `version`
    pub fn for_version(version: SchemaVersion) -> Self {
        Self {
            schema_version: version,
            ..Default::default()
        }
    }
}

/// Maps intermediate models to IDS documents
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper {
    config: MapperConfig,
}

impl SchemaMapper {
    /// Create a mapper with the given configuration
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// The mapper's configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Schema generation this mapper emits
    pub fn schema_version(&self) -> SchemaVersion {
        self.config.schema_version
    }

    /// Map a model, stamping the current time as conversion timestamp
    pub fn map(&self, model: &IntermediateModel) -> Result<IdsDocument, ModelError> {
        self.map_at(model, Utc::now())
    }

    /// Map a model with an explicit conversion timestamp.
    ///
    /// With a fixed timestamp the output is fully deterministic.
    pub fn map_at(
        &self,
        model: &IntermediateModel,
        converted_at: DateTime<Utc>,
    ) -> Result<IdsDocument, ModelError> {
        let metadata = &model.metadata;
        if metadata.source_file.is_empty() {
            return Err(ModelError::missing("metadata.source_file"));
        }
        if metadata.extraction_timestamp.is_empty() {
            return Err(ModelError::missing("metadata.extraction_timestamp"));
        }

        let version = self.config.schema_version;
        let provenance = Provenance {
            source_format: self.config.source_format.clone(),
            source_file: metadata.source_file.clone(),
            extraction_timestamp: metadata.extraction_timestamp.clone(),
            conversion_timestamp: converted_at.to_rfc3339(),
            extraction_tool: metadata.decoder_identity(),
        };

        let run_info = RunInfo {
            run_timestamp: metadata.run_date.clone(),
            run_name: model
                .curves
                .iter()
                .filter_map(|c| c.run_name.as_deref())
                .find(|name| !name.is_empty())
                .map(str::to_string),
            instrument: self.config.instrument.clone(),
            ..Default::default()
        };

        let (data, custom_data) = match version {
            SchemaVersion::V1 => (IdsData::Curves(self.map_v1(model)), None),
            SchemaVersion::Legacy => (IdsData::Sensors(self.map_legacy(model)), Some(Map::new())),
        };

        let document = IdsDocument {
            schema_version: version.as_str().to_string(),
            metadata: provenance,
            run_info,
            data,
            custom_data,
        };

        debug!(
            "Mapped {} to IDS {}: {} curves, {} events",
            metadata.source_file,
            version,
            document.curve_count(),
            document.event_count()
        );

        Ok(document)
    }

    fn map_v1(&self, model: &IntermediateModel) -> CurveData {
        let curves = model
            .curves
            .iter()
            .map(|curve| CurveRecord {
                curve_id: curve_id_for(&curve.id),
                curve_type: curve.kind(),
                curve_name: curve.label.clone(),
                unit: curve.unit.clone(),
                x_axis: self.config.x_axis.clone(),
                data: curve.data.clone(),
                sampling_rate: estimate_sampling_rate(&curve.data),
                metadata: uv_wavelength(curve).map(|wavelength_nm| CurveMetadata { wavelength_nm }),
            })
            .collect();

        let events = numbered_events(model, SchemaVersion::V1)
            .map(|(n, kind, label, entry)| EventRecord {
                event_id: event_id_for(n),
                event_type: kind,
                event_name: label.to_string(),
                position: Position {
                    value: entry.position,
                    unit: self.config.x_axis.unit.clone(),
                },
                text: entry.text(),
            })
            .collect();

        CurveData {
            curves,
            events,
            peaks: Vec::new(),
        }
    }

    fn map_legacy(&self, model: &IntermediateModel) -> SensorData {
        let sensors = model
            .curves
            .iter()
            .map(|curve| SensorRecord {
                sensor_id: curve_id_for(&curve.id),
                sensor_type: curve.kind(),
                sensor_name: curve.label.clone(),
                unit: curve.unit.clone(),
                x_axis_type: self.config.x_axis.axis_type.clone(),
                x_axis_unit: self.config.x_axis.unit.clone(),
                data_points: curve.data.clone(),
                wavelength_nm: uv_wavelength(curve),
                sampling_rate_hz: None,
            })
            .collect();

        let events = numbered_events(model, SchemaVersion::Legacy)
            .map(|(n, kind, label, entry)| LegacyEventRecord {
                event_id: event_id_for(n),
                event_type: kind,
                event_name: label.to_string(),
                position: SplitPosition {
                    volume_ml: Some(entry.position),
                    time_min: None,
                    timestamp: None,
                },
                description: entry.text(),
            })
            .collect();

        SensorData {
            sensors,
            events,
            peaks: Vec::new(),
            fractions: Vec::new(),
        }
    }
}

fn uv_wavelength(curve: &CurveGroup) -> Option<u32> {
    match curve.kind() {
        CurveKind::Uv => parse_wavelength(&curve.label),
        _ => None,
    }
}

/// Flatten all event entries with their 1-based global index and kind
fn numbered_events(
    model: &IntermediateModel,
    version: SchemaVersion,
) -> impl Iterator<Item = (usize, EventKind, &str, &EventEntry)> {
    model
        .events
        .iter()
        .flat_map(move |group| {
            let kind = classify_event(&group.label, version);
            group
                .data
                .iter()
                .map(move |entry| (kind, group.label.as_str(), entry))
        })
        .enumerate()
        .map(|(i, (kind, label, entry))| (i + 1, kind, label, entry))
}
