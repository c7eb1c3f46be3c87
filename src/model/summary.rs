use serde::{Deserialize, Serialize};

use super::{FileMetadata, IntermediateModel, Point};

/// Cheap-to-inspect view of an intermediate model: everything except the
/// bulk point and event arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// File-level metadata, unchanged
    pub metadata: FileMetadata,
    /// One entry per curve group
    pub curves: Vec<CurveSummary>,
    /// One entry per event group
    pub events: Vec<EventSummary>,
}

/// Curve group without its samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSummary {
    pub id: String,
    pub label: String,
    pub data_type: String,
    pub unit: String,
    pub data_points: usize,
    #[serde(default, with = "super::optional_point")]
    pub first_point: Option<Point>,
    #[serde(default, with = "super::optional_point")]
    pub last_point: Option<Point>,
}

/// Event group without its entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub label: String,
    pub event_count: usize,
}

impl From<&IntermediateModel> for ModelSummary {
    fn from(model: &IntermediateModel) -> Self {
        Self {
            metadata: model.metadata.clone(),
            curves: model
                .curves
                .iter()
                .map(|curve| CurveSummary {
                    id: curve.id.clone(),
                    label: curve.label.clone(),
                    data_type: curve.data_type.clone(),
                    unit: curve.unit.clone(),
                    data_points: curve.len(),
                    first_point: curve.data.first().copied(),
                    last_point: curve.data.last().copied(),
                })
                .collect(),
            events: model
                .events
                .iter()
                .map(|group| EventSummary {
                    id: group.id.clone(),
                    label: group.label.clone(),
                    event_count: group.len(),
                })
                .collect(),
        }
    }
}
