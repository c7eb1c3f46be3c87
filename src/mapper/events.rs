use crate::ids::{EventKind, SchemaVersion};

/// Classify an event group label.
///
/// Case-insensitive substring rules, first match wins:
///
/// | label contains            | legacy      | v1            |
/// |---------------------------|-------------|---------------|
/// | `inject`                  | injection   | injection     |
/// | `fraction` + `start`      | fraction_start | fraction_start |
/// | `fraction` + `end`        | fraction_end | fraction_end |
/// | `fraction`                | other       | other         |
/// | `log`                     | logbook     | user_mark     |
/// | `alarm` / `warning`       | alarm       | alarm         |
/// | `mark`                    | mark        | user_mark     |
/// | `phase` / `method`        | other       | method_step   |
/// | anything else             | other       | other         |
///
/// Ties are resolved by this order, not by specificity: "Fraction log" is
/// `other`, "Injection alarm" is `injection`.
pub fn classify_event(label: &str, version: SchemaVersion) -> EventKind {
    let name = label.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    if has("inject") {
        EventKind::Injection
    } else if has("fraction") {
        if has("start") {
            EventKind::FractionStart
        } else if has("end") {
            EventKind::FractionEnd
        } else {
            EventKind::Other
        }
    } else if has("log") {
        match version {
            SchemaVersion::Legacy => EventKind::Logbook,
            SchemaVersion::V1 => EventKind::UserMark,
        }
    } else if has("alarm") || has("warning") {
        EventKind::Alarm
    } else if has("mark") {
        match version {
            SchemaVersion::Legacy => EventKind::Mark,
            SchemaVersion::V1 => EventKind::UserMark,
        }
    } else if version == SchemaVersion::V1 && (has("phase") || has("method")) {
        EventKind::MethodStep
    } else {
        EventKind::Other
    }
}
