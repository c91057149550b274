//! Field decoders for upstream documents
//!
//! Profile documents are written by another service and stored in a
//! schemaless collection, so a single field can arrive in the wrong shape.
//! Each decoder here maps a value it cannot read to "absent" instead of
//! failing the whole document.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, or a string holding one
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_number(&Value::deserialize(deserializer)?))
}

/// Non-negative whole number, or a string holding one
pub fn whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_number(&Value::deserialize(deserializer)?)
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.trunc() as u32))
}

/// Boolean, or `"true"` / `"false"`
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => s.trim().to_lowercase().parse().ok(),
        _ => None,
    })
}

/// Free-text label; numbers and booleans are kept as their text
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Tag list; non-text entries are skipped and a lone string is one tag
pub fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// RFC 3339 string, or epoch milliseconds as a number or string
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    if let Value::String(s) = &value {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
    }

    Ok(as_number(&value)
        .filter(|ms| ms.is_finite())
        .and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single()))
}

/// Nested object, or an object serialized into a JSON string
///
/// Anything unreadable yields `T::default()`.
pub fn nested<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = match Value::deserialize(deserializer)? {
        Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::Null),
        other => other,
    };

    if !value.is_object() {
        return Ok(T::default());
    }

    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Document {
        #[serde(default, deserialize_with = "number")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "whole_number")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "flag")]
        enabled: Option<bool>,
        #[serde(default, deserialize_with = "tags")]
        labels: Vec<String>,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn decode(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let decoded = decode(r#"{"score": " 7.5 ", "count": "30"}"#);
        assert_eq!(decoded.score, Some(7.5));
        assert_eq!(decoded.count, Some(30));
    }

    #[test]
    fn test_unreadable_values_become_absent() {
        let json = r#"{"score": {"x": 1}, "count": -4, "enabled": 3, "labels": 12, "at": true}"#;
        let decoded = decode(json);
        assert_eq!(decoded.score, None);
        assert_eq!(decoded.count, None);
        assert_eq!(decoded.enabled, None);
        assert!(decoded.labels.is_empty());
        assert_eq!(decoded.at, None);
    }

    #[test]
    fn test_tags_skip_non_text_entries() {
        let decoded = decode(r#"{"labels": ["jazz", null, 42, {"a": 1}]}"#);
        assert_eq!(decoded.labels, vec!["jazz", "42"]);
    }

    #[test]
    fn test_timestamp_accepts_epoch_millis_and_rfc3339() {
        let expected = Utc.timestamp_millis_opt(1_700_000_000_000).single();

        assert_eq!(decode(r#"{"at": 1700000000000}"#).at, expected);
        assert_eq!(decode(r#"{"at": "1700000000000"}"#).at, expected);
        assert_eq!(decode(r#"{"at": "2023-11-14T22:13:20Z"}"#).at, expected);
    }

    #[test]
    fn test_flag_accepts_strings() {
        assert_eq!(decode(r#"{"enabled": "TRUE"}"#).enabled, Some(true));
        assert_eq!(decode(r#"{"enabled": false}"#).enabled, Some(false));
    }
}
