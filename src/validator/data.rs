use crate::ids::IdsDocument;

use super::{ValidationCheck, ValidationReport};

/// Advisory scan for NaN or infinite values in curve points and event
/// positions. The mapper passes these through; here they only warn.
pub(crate) fn check_finite_values(doc: &IdsDocument, report: &mut ValidationReport) {
    let mut non_finite = 0usize;
    let mut first_at: Option<String> = None;

    for curve in doc.curves() {
        let bad = curve
            .points
            .iter()
            .filter(|(x, y)| !x.is_finite() || !y.is_finite())
            .count();
        if bad > 0 && first_at.is_none() {
            first_at = Some(format!("curve {}", curve.curve_id));
        }
        non_finite += bad;
    }

    for event in doc.events() {
        if matches!(event.position, Some(p) if !p.is_finite()) {
            if first_at.is_none() {
                first_at = Some(format!("event {}", event.event_id));
            }
            non_finite += 1;
        }
    }

    match first_at {
        None => report.add_check(ValidationCheck::ok("Finite values")),
        Some(location) => report.add_check(ValidationCheck::warning(
            "Finite values",
            format!("{non_finite} non-finite value(s), first in {location}"),
        )),
    }
}
