use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of an IDS event.
///
/// Not every kind exists in every schema generation; see
/// [`crate::mapper::classify_event`] for which labels produce which kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Sample injection
    Injection,
    /// Start of a fraction
    FractionStart,
    /// End of a fraction
    FractionEnd,
    /// Logbook entry (legacy generation)
    Logbook,
    /// Manual or logbook mark (v1 generation)
    UserMark,
    /// Mark (legacy generation)
    Mark,
    /// Alarm or warning
    Alarm,
    /// Method phase or step (v1 generation)
    MethodStep,
    /// Anything unclassified, including bare fraction events
    Other,
}

impl EventKind {
    /// Name used in IDS documents
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Injection => "injection",
            EventKind::FractionStart => "fraction_start",
            EventKind::FractionEnd => "fraction_end",
            EventKind::Logbook => "logbook",
            EventKind::UserMark => "user_mark",
            EventKind::Mark => "mark",
            EventKind::Alarm => "alarm",
            EventKind::MethodStep => "method_step",
            EventKind::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
