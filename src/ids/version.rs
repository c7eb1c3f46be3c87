use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// IDS schema generation.
///
/// The two generations differ in output shape (`data.sensors` vs
/// `data.curves`, split vs single event positions) and in the event-kind
/// vocabulary. One mapper serves both, dispatching on this tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaVersion {
    /// First generation: `data.sensors`, `logbook`/`mark` event kinds
    Legacy,
    /// Current generation: `data.curves`, `user_mark`/`method_step` event kinds
    #[default]
    V1,
}

impl SchemaVersion {
    /// Every supported generation, oldest first
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Legacy, SchemaVersion::V1];

    /// Semantic version string written to `schema_version`
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "0.9.0",
            SchemaVersion::V1 => "1.0.0",
        }
    }

    /// Key under `data` holding the curve records
    pub fn curves_key(&self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "sensors",
            SchemaVersion::V1 => "curves",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0.9.0" | "0.9" | "legacy" => Ok(SchemaVersion::Legacy),
            "1.0.0" | "1.0" | "v1" => Ok(SchemaVersion::V1),
            other => Err(format!(
                "Unknown schema version '{}'. Supported: {}",
                other,
                SchemaVersion::ALL.map(|v| v.as_str()).join(", ")
            )),
        }
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.as_str().to_string()
    }
}
