//! JSON encoding for sample values that may be non-finite.
//!
//! JSON has no NaN or infinity, and `serde_json` would write them as `null`,
//! which then fails to load as `f64`. Non-finite values are written as the
//! strings `"NaN"`, `"inf"` and `"-inf"` instead. Reading accepts those tags,
//! their common spellings, and `null` (read as NaN).

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use super::Point;

/// An `f64` that survives a JSON round trip even when non-finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonNumber(pub f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() {
            serializer.serialize_f64(value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

struct JsonNumberVisitor;

impl<'de> Visitor<'de> for JsonNumberVisitor {
    type Value = JsonNumber;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, null, or one of \"NaN\", \"inf\", \"-inf\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(JsonNumber(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(JsonNumber(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(JsonNumber(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v.to_ascii_lowercase().as_str() {
            "nan" => Ok(JsonNumber(f64::NAN)),
            "inf" | "+inf" | "infinity" | "+infinity" => Ok(JsonNumber(f64::INFINITY)),
            "-inf" | "-infinity" => Ok(JsonNumber(f64::NEG_INFINITY)),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(JsonNumber(f64::NAN))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(JsonNumber(f64::NAN))
    }
}

impl<'de> Deserialize<'de> for JsonNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsonNumberVisitor)
    }
}

/// `#[serde(with)]` adapter for a single `f64`
pub mod number {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        JsonNumber(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        JsonNumber::deserialize(deserializer).map(|n| n.0)
    }
}

/// `#[serde(with)]` adapter for an optional `f64`; `null` stays `None`
pub mod optional_number {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(JsonNumber).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<JsonNumber>::deserialize(deserializer).map(|n| n.map(|n| n.0))
    }
}

/// `#[serde(with)]` adapter for a point sequence `[[x, y], ...]`
pub mod points {
    use super::*;

    pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(points.iter().map(|&(x, y)| (JsonNumber(x), JsonNumber(y))))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
        let raw = Vec::<(JsonNumber, JsonNumber)>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|(x, y)| (x.0, y.0)).collect())
    }
}

/// `#[serde(with)]` adapter for an optional single point
pub mod optional_point {
    use super::*;

    pub fn serialize<S: Serializer>(
        point: &Option<Point>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        point
            .map(|(x, y)| (JsonNumber(x), JsonNumber(y)))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Point>, D::Error> {
        let raw = Option::<(JsonNumber, JsonNumber)>::deserialize(deserializer)?;
        Ok(raw.map(|(x, y)| (x.0, y.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_values_written_as_tags() {
        let encoded = serde_json::to_string(&[
            JsonNumber(1.5),
            JsonNumber(f64::NAN),
            JsonNumber(f64::INFINITY),
            JsonNumber(f64::NEG_INFINITY),
        ])
        .unwrap();
        assert_eq!(encoded, r#"[1.5,"NaN","inf","-inf"]"#);
    }

    #[test]
    fn test_tags_and_null_read_back() {
        let decoded: Vec<JsonNumber> =
            serde_json::from_str(r#"[2, 0.25, "NaN", "Infinity", "-inf", null]"#).unwrap();
        assert_eq!(decoded[0].0, 2.0);
        assert_eq!(decoded[1].0, 0.25);
        assert!(decoded[2].0.is_nan());
        assert_eq!(decoded[3].0, f64::INFINITY);
        assert_eq!(decoded[4].0, f64::NEG_INFINITY);
        assert!(decoded[5].0.is_nan());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(serde_json::from_str::<JsonNumber>(r#""lots""#).is_err());
    }
}
