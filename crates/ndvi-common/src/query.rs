//! Query parameters accepted by both transport surfaces.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bbox::BoundingBox;
use crate::error::{ValidationError, ValidationResult};

/// Half-width in degrees of the box searched around the requested point.
///
/// The caller-supplied `buffer` is echoed in responses but not applied here.
pub const QUERY_BUFFER_DEGREES: f64 = 1.0;

/// Location and year for an NDVI statistics request.
///
/// Every field is optional on input. Numeric strings are accepted for the
/// float fields and an integer year is accepted and kept as its decimal text.
/// No range checks are made on the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(default = "default_latitude", deserialize_with = "latitude")]
    pub latitude: f64,

    #[serde(default = "default_longitude", deserialize_with = "longitude")]
    pub longitude: f64,

    #[serde(default = "default_buffer", deserialize_with = "buffer")]
    pub buffer: f64,

    #[serde(default = "default_year", deserialize_with = "year")]
    pub year: String,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            buffer: default_buffer(),
            year: default_year(),
        }
    }
}

impl QueryParameters {
    /// Parse a raw request body. An empty body yields the defaults.
    pub fn from_json_slice(body: &[u8]) -> ValidationResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::from_json_value(value)
    }

    /// Build from an already-parsed JSON value, which must be an object.
    ///
    /// Keys other than the four parameters are ignored.
    pub fn from_json_value(value: Value) -> ValidationResult<Self> {
        if !value.is_object() {
            return Err(ValidationError::NotAnObject(json_kind(&value).to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Area searched in the catalog and loaded from rasters.
    ///
    /// Always `[lon-1, lat-1, lon+1, lat+1]`, whatever `buffer` says.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around_point(self.longitude, self.latitude, QUERY_BUFFER_DEGREES)
    }
}

fn default_latitude() -> f64 {
    38.6
}

fn default_longitude() -> f64 {
    -121.5
}

fn default_buffer() -> f64 {
    1.0
}

fn default_year() -> String {
    "2021".to_string()
}

fn latitude<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    lenient_float(d, "latitude")
}

fn longitude<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    lenient_float(d, "longitude")
}

fn buffer<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    lenient_float(d, "buffer")
}

fn lenient_float<'de, D: Deserializer<'de>>(d: D, field: &str) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(de::Error::custom(format!(
            "'{}' must be a finite number, got {}",
            field, value
        ))),
    }
}

fn year<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "'year' must be a string, got {}",
            other
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_body() {
        let params = QueryParameters::from_json_slice(b"").unwrap();
        assert_eq!(params, QueryParameters::default());
        assert_eq!(params.latitude, 38.6);
        assert_eq!(params.longitude, -121.5);
        assert_eq!(params.buffer, 1.0);
        assert_eq!(params.year, "2021");

        let params = QueryParameters::from_json_slice(b"{}").unwrap();
        assert_eq!(params, QueryParameters::default());
    }

    #[test]
    fn test_partial_body_keeps_other_defaults() {
        let params =
            QueryParameters::from_json_slice(br#"{"latitude": 40.0, "year": "2019"}"#).unwrap();
        assert_eq!(params.latitude, 40.0);
        assert_eq!(params.longitude, -121.5);
        assert_eq!(params.year, "2019");
    }

    #[test]
    fn test_lenient_coercion() {
        let params = QueryParameters::from_json_value(json!({
            "latitude": "12.5",
            "longitude": -3,
            "buffer": "2",
            "year": 2020,
            "api_key": "ignored"
        }))
        .unwrap();
        assert_eq!(params.latitude, 12.5);
        assert_eq!(params.longitude, -3.0);
        assert_eq!(params.buffer, 2.0);
        assert_eq!(params.year, "2020");
    }

    #[test]
    fn test_rejects_non_numeric_latitude() {
        let err = QueryParameters::from_json_value(json!({"latitude": "north"})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameters(_)));
        assert!(err.to_string().contains("latitude"));

        let err = QueryParameters::from_json_value(json!({"longitude": null})).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_rejects_bad_year_and_non_objects() {
        assert!(QueryParameters::from_json_value(json!({"year": 20.5})).is_err());
        assert!(QueryParameters::from_json_value(json!({"year": true})).is_err());
        assert!(matches!(
            QueryParameters::from_json_value(json!([1, 2])),
            Err(ValidationError::NotAnObject(_))
        ));
        assert!(matches!(
            QueryParameters::from_json_slice(b"{not json"),
            Err(ValidationError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_no_range_checks() {
        let params = QueryParameters::from_json_value(json!({"latitude": 123.0})).unwrap();
        assert_eq!(params.latitude, 123.0);
    }

    #[test]
    fn test_bounding_box_ignores_buffer() {
        let mut params = QueryParameters::default();
        let expected = [-122.5, 37.6, -120.5, 39.6];
        for buffer in [0.1, 1.0, 5.0, 250.0] {
            params.buffer = buffer;
            let bbox = params.bounding_box().to_array();
            for (got, want) in bbox.iter().zip(expected.iter()) {
                assert!((got - want).abs() < 1e-9);
            }
        }
    }
}
