use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{JsonNumber, ModelError};

/// A single positioned annotation.
///
/// Serialized as a two-element array `[position, description]`, the shape
/// decoders emit. A non-finite position is written as a string tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(JsonNumber, Value)", into = "(JsonNumber, Value)")]
pub struct EventEntry {
    /// Position along the x axis (volume)
    pub position: f64,

    /// Free-form description; usually text, sometimes a number
    pub description: Value,
}

impl EventEntry {
    /// Create an entry with a text description
    pub fn new(position: f64, description: impl Into<String>) -> Self {
        Self {
            position,
            description: Value::String(description.into()),
        }
    }

    /// Description as text: strings verbatim, anything else stringified
    pub fn text(&self) -> String {
        match &self.description {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<(JsonNumber, Value)> for EventEntry {
    fn from((position, description): (JsonNumber, Value)) -> Self {
        Self {
            position: position.0,
            description,
        }
    }
}

impl From<EventEntry> for (JsonNumber, Value) {
    fn from(entry: EventEntry) -> Self {
        (JsonNumber(entry.position), entry.description)
    }
}

/// A named group of annotations (injections, fractions, logbook, ...).
///
/// The label drives semantic classification at mapping time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Identifier of the group
    pub id: String,

    /// Human label (e.g., "Fraction Start", "Logbook")
    pub label: String,

    /// Entries in instrument order
    #[serde(default)]
    pub data: Vec<EventEntry>,
}

impl EventGroup {
    /// Create an event group, rejecting an empty identifier.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        data: Vec<EventEntry>,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::missing("events[].id"));
        }
        Ok(Self {
            id,
            label: label.into(),
            data,
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the group has no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
