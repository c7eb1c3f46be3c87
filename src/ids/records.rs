use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{number, optional_number, points, CurveKind, Point};

use super::EventKind;

/// X-axis descriptor of a curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XAxis {
    /// Axis quantity (e.g., "volume")
    #[serde(rename = "type")]
    pub axis_type: String,
    /// Axis unit (e.g., "ml")
    pub unit: String,
}

impl Default for XAxis {
    fn default() -> Self {
        Self {
            axis_type: "volume".to_string(),
            unit: "ml".to_string(),
        }
    }
}

/// Curve-level metadata (v1 generation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveMetadata {
    /// Detection wavelength of a UV curve
    pub wavelength_nm: u32,
}

/// Curve record of the v1 generation (`data.curves[]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Deterministic id derived from the source identifier
    pub curve_id: String,
    /// Semantic kind
    pub curve_type: CurveKind,
    /// Original label
    pub curve_name: String,
    /// Unit of the y values
    pub unit: String,
    /// X-axis descriptor
    pub x_axis: XAxis,
    /// Samples, copied verbatim
    #[serde(with = "points")]
    pub data: Vec<Point>,
    /// Approximate points per x-axis unit, null when not estimable
    pub sampling_rate: Option<f64>,
    /// Present only when there is something to say (UV wavelength)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CurveMetadata>,
}

/// Curve record of the legacy generation (`data.sensors[]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub sensor_id: String,
    pub sensor_type: CurveKind,
    pub sensor_name: String,
    pub unit: String,
    pub x_axis_type: String,
    pub x_axis_unit: String,
    #[serde(with = "points")]
    pub data_points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wavelength_nm: Option<u32>,
    /// Always null: a rate in Hz needs the flow rate, which is not decoded
    pub sampling_rate_hz: Option<f64>,
}

/// Single-value event position (v1 generation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(with = "number")]
    pub value: f64,
    pub unit: String,
}

/// Volume/time split event position (legacy generation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPosition {
    #[serde(default, with = "optional_number")]
    pub volume_ml: Option<f64>,
    #[serde(default, with = "optional_number")]
    pub time_min: Option<f64>,
    pub timestamp: Option<String>,
}

/// Event record of the v1 generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// `event_NNN`, 1-based across the whole document
    pub event_id: String,
    pub event_type: EventKind,
    /// Label of the source event group
    pub event_name: String,
    pub position: Position,
    pub text: String,
}

/// Event record of the legacy generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEventRecord {
    pub event_id: String,
    pub event_type: EventKind,
    pub event_name: String,
    pub position: SplitPosition,
    pub description: String,
}

/// `data` block of the v1 generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub curves: Vec<CurveRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Reserved; always empty, no peak detection happens here
    #[serde(default)]
    pub peaks: Vec<Value>,
}

/// `data` block of the legacy generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub sensors: Vec<SensorRecord>,
    #[serde(default)]
    pub events: Vec<LegacyEventRecord>,
    #[serde(default)]
    pub peaks: Vec<Value>,
    #[serde(default)]
    pub fractions: Vec<Value>,
}

/// `data` block, shaped by schema generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdsData {
    /// v1: `data.curves`
    Curves(CurveData),
    /// legacy: `data.sensors`
    Sensors(SensorData),
}
