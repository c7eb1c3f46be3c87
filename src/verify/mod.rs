//! # Round-Trip Verification
//!
//! Proves an IDS document still holds everything its intermediate model
//! held. All checks always run, so one call surfaces every discrepancy:
//!
//! - global curve count and global event count
//! - per curve, re-located by recomputing [`curve_id_for`]: point count,
//!   first point and last point (both axes)
//! - per event, matched by its 1-based global index: position
//!
//! Numeric comparisons use an absolute tolerance of `1e-6`; two NaNs compare
//! equal so that a pass-through value is not reported as lost.

mod discrepancy;
mod report;


use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::ids::{curve_id_for, event_id_for, IdsDocument, IdsError};
use crate::model::{IntermediateModel, ModelError, Point};

pub use discrepancy::Discrepancy;
pub use report::VerificationReport;

/// Default absolute tolerance for numeric equality
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Errors loading a pair of files for verification
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The intermediate model could not be loaded
    #[error("Intermediate model error: {0}")]
    ModelError(#[from] ModelError),

    /// The IDS document could not be loaded
    #[error("IDS document error: {0}")]
    IdsError(#[from] IdsError),
}

/// Compares intermediate models with their derived IDS documents
#[derive(Debug, Clone, Copy)]
pub struct RoundTripVerifier {
    tolerance: f64,
}

impl Default for RoundTripVerifier {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RoundTripVerifier {
    /// Verifier with a custom absolute tolerance
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Absolute tolerance in use
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether two values are equal within tolerance
    pub fn values_match(&self, a: f64, b: f64) -> bool {
        if a == b || (a.is_nan() && b.is_nan()) {
            return true;
        }
        (a - b).abs() <= self.tolerance
    }

    fn points_match(&self, a: Point, b: Point) -> bool {
        self.values_match(a.0, b.0) && self.values_match(a.1, b.1)
    }

    /// Run every check and collect the discrepancies
    pub fn verify(&self, model: &IntermediateModel, doc: &IdsDocument) -> VerificationReport {
        let mut issues = Vec::new();

        let expected_curves = model.curve_count();
        let expected_events = model.event_count();

        if doc.curve_count() != expected_curves {
            issues.push(Discrepancy::CurveCountMismatch {
                expected: expected_curves,
                found: doc.curve_count(),
            });
        }
        if doc.event_count() != expected_events {
            issues.push(Discrepancy::EventCountMismatch {
                expected: expected_events,
                found: doc.event_count(),
            });
        }

        self.check_curves(model, doc, &mut issues);
        self.check_events(model, doc, &mut issues);

        let report = VerificationReport::new(
            model.metadata.source_file.clone(),
            issues,
            expected_curves,
            expected_events,
        );

        if report.passed {
            info!(
                "Round-trip verified for {}: {} curves, {} events",
                report.subject, expected_curves, expected_events
            );
        } else {
            for issue in &report.issues {
                warn!("{}: {}", report.subject, issue);
            }
        }

        report
    }

    fn check_curves(
        &self,
        model: &IntermediateModel,
        doc: &IdsDocument,
        issues: &mut Vec<Discrepancy>,
    ) {
        for source in &model.curves {
            let curve_id = curve_id_for(&source.id);
            let Some(target) = doc.find_curve(&curve_id) else {
                issues.push(Discrepancy::CurveMissing { curve_id });
                continue;
            };

            if source.data.len() != target.points.len() {
                issues.push(Discrepancy::PointCountMismatch {
                    curve_id: curve_id.clone(),
                    expected: source.data.len(),
                    found: target.points.len(),
                });
            }

            if let (Some(&expected), Some(&found)) = (source.data.first(), target.points.first()) {
                if !self.points_match(expected, found) {
                    issues.push(Discrepancy::FirstPointMismatch {
                        curve_id: curve_id.clone(),
                        expected,
                        found,
                    });
                }
            }

            if let (Some(&expected), Some(&found)) = (source.data.last(), target.points.last()) {
                if !self.points_match(expected, found) {
                    issues.push(Discrepancy::LastPointMismatch {
                        curve_id,
                        expected,
                        found,
                    });
                }
            }
        }
    }

    fn check_events(
        &self,
        model: &IntermediateModel,
        doc: &IdsDocument,
        issues: &mut Vec<Discrepancy>,
    ) {
        let positions: HashMap<&str, Option<f64>> = doc
            .events()
            .into_iter()
            .map(|event| (event.event_id, event.position))
            .collect();

        let entries = model.events.iter().flat_map(|group| group.data.iter());
        for (i, entry) in entries.enumerate() {
            let event_id = event_id_for(i + 1);
            match positions.get(event_id.as_str()) {
                None => issues.push(Discrepancy::EventMissing { event_id }),
                Some(Some(found)) if self.values_match(entry.position, *found) => {}
                Some(found) => issues.push(Discrepancy::EventPositionMismatch {
                    event_id,
                    expected: entry.position,
                    found: *found,
                }),
            }
        }
    }
}

/// Verify with the default tolerance
pub fn verify(model: &IntermediateModel, doc: &IdsDocument) -> VerificationReport {
    RoundTripVerifier::default().verify(model, doc)
}

/// Load `<base>_extracted.json` and `<base>.ids.json` and verify the pair
pub fn verify_files(extracted: &Path, ids: &Path) -> Result<VerificationReport, VerifyError> {
    let model = IntermediateModel::from_file(extracted)?;
    let doc = IdsDocument::from_file(ids)?;
    Ok(verify(&model, &doc))
}
