use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Shape of the CSV export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CsvLayout {
    /// One table per run: shared x column, one value column per curve (default)
    #[default]
    Wide,

    /// One narrow table per curve plus a shared events table
    PerCurve,
}

impl CsvLayout {
    /// Returns all available layout names.
    pub fn variants() -> &'static [&'static str] {
        &["wide", "per-curve"]
    }
}

impl fmt::Display for CsvLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvLayout::Wide => write!(f, "wide"),
            CsvLayout::PerCurve => write!(f, "per-curve"),
        }
    }
}

impl FromStr for CsvLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wide" | "combined" => Ok(CsvLayout::Wide),
            "per-curve" | "percurve" | "individual" => Ok(CsvLayout::PerCurve),
            _ => Err(format!(
                "Unknown CSV layout '{}'. Valid options: {}",
                s,
                CsvLayout::variants().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_str() {
        assert_eq!(CsvLayout::from_str("wide").unwrap(), CsvLayout::Wide);
        assert_eq!(CsvLayout::from_str("Per-Curve").unwrap(), CsvLayout::PerCurve);
        assert_eq!(CsvLayout::from_str("individual").unwrap(), CsvLayout::PerCurve);
        assert!(CsvLayout::from_str("long").is_err());
    }

    #[test]
    fn test_layout_serde() {
        let layout: CsvLayout = serde_json::from_str("\"per-curve\"").unwrap();
        assert_eq!(layout, CsvLayout::PerCurve);
        assert_eq!(CsvLayout::default().to_string(), "wide");
    }
}
