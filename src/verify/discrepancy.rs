use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// One itemized round-trip integrity issue.
///
/// Each variant names the record it concerns so a report line alone is
/// enough to find the problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// Number of curves differs
    CurveCountMismatch { expected: usize, found: usize },
    /// Number of events differs
    EventCountMismatch { expected: usize, found: usize },
    /// A source curve has no record with its derived id
    CurveMissing { curve_id: String },
    /// A curve lost or gained points
    PointCountMismatch {
        curve_id: String,
        expected: usize,
        found: usize,
    },
    /// First point differs beyond tolerance
    FirstPointMismatch {
        curve_id: String,
        expected: Point,
        found: Point,
    },
    /// Last point differs beyond tolerance
    LastPointMismatch {
        curve_id: String,
        expected: Point,
        found: Point,
    },
    /// A source event has no record with its sequence id
    EventMissing { event_id: String },
    /// Event position differs beyond tolerance (or is missing)
    EventPositionMismatch {
        event_id: String,
        expected: f64,
        found: Option<f64>,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::CurveCountMismatch { expected, found } => {
                write!(f, "Curve count mismatch: {expected} vs {found}")
            }
            Discrepancy::EventCountMismatch { expected, found } => {
                write!(f, "Event count mismatch: {expected} vs {found}")
            }
            Discrepancy::CurveMissing { curve_id } => {
                write!(f, "Curve {curve_id} not found in IDS")
            }
            Discrepancy::PointCountMismatch {
                curve_id,
                expected,
                found,
            } => write!(
                f,
                "Curve {curve_id}: data point count mismatch ({expected} vs {found})"
            ),
            Discrepancy::FirstPointMismatch {
                curve_id,
                expected,
                found,
            } => write!(
                f,
                "Curve {curve_id}: first point mismatch ({:?} vs {:?})",
                expected, found
            ),
            Discrepancy::LastPointMismatch {
                curve_id,
                expected,
                found,
            } => write!(
                f,
                "Curve {curve_id}: last point mismatch ({:?} vs {:?})",
                expected, found
            ),
            Discrepancy::EventMissing { event_id } => {
                write!(f, "Event {event_id} not found in IDS")
            }
            Discrepancy::EventPositionMismatch {
                event_id,
                expected,
                found,
            } => match found {
                Some(found) => write!(
                    f,
                    "Event {event_id}: position mismatch ({expected} vs {found})"
                ),
                None => write!(f, "Event {event_id}: position missing (expected {expected})"),
            },
        }
    }
}
