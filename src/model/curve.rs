use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// One sample of a curve: (x, y) where x is the independent axis (volume).
pub type Point = (f64, f64);

/// Semantic kind of a sensor curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// UV absorbance
    #[serde(rename = "UV")]
    Uv,
    /// Conductivity
    Conductivity,
    /// System or column pressure
    Pressure,
    /// Temperature
    Temperature,
    /// pH
    #[serde(rename = "pH")]
    Ph,
    /// Anything else the instrument records
    Other,
}

impl CurveKind {
    /// Map a decoder `data_type` tag onto the closed kind set.
    ///
    /// Unknown tags fall through to [`CurveKind::Other`].
    pub fn from_source_tag(tag: &str) -> Self {
        match tag {
            "UV" => CurveKind::Uv,
            "Conduction" | "Conductivity" => CurveKind::Conductivity,
            "Pressure" => CurveKind::Pressure,
            "Temperature" => CurveKind::Temperature,
            "pH" => CurveKind::Ph,
            _ => CurveKind::Other,
        }
    }

    /// Name used in IDS documents
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Uv => "UV",
            CurveKind::Conductivity => "Conductivity",
            CurveKind::Pressure => "Pressure",
            CurveKind::Temperature => "Temperature",
            CurveKind::Ph => "pH",
            CurveKind::Other => "Other",
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named sensor trace as delivered by the decoder.
///
/// Points are kept exactly as decoded, non-finite values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGroup {
    /// Identifier, unique within a file
    pub id: String,

    /// Human label (e.g., "UV 1_280")
    pub label: String,

    /// Decoder data type tag (e.g., "UV", "Conduction")
    pub data_type: String,

    /// Unit of the y values, may be empty
    #[serde(default)]
    pub unit: String,

    /// Run name the decoder attached to this curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,

    /// (x, y) samples in instrument order
    #[serde(default, with = "super::points")]
    pub data: Vec<Point>,
}

impl CurveGroup {
    /// Create a curve group, rejecting an empty identifier.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: impl Into<String>,
        unit: impl Into<String>,
        data: Vec<Point>,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::missing("curves[].id"));
        }
        Ok(Self {
            id,
            label: label.into(),
            data_type: data_type.into(),
            unit: unit.into(),
            run_name: None,
            data,
        })
    }

    /// Attach the run name reported for this curve
    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = Some(run_name.into());
        self
    }

    /// Semantic kind derived from the decoder tag
    pub fn kind(&self) -> CurveKind {
        CurveKind::from_source_tag(&self.data_type)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the curve has no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
