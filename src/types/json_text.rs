// src/types/json_text.rs
//! Lenient field codecs for the recruitment API.
//!
//! The backend stores several columns as JSON text (post skills, application
//! detail) and returns booleans and numbers in whatever shape the database
//! driver produced. These helpers accept every shape we have seen.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Deserialize `T` from either JSON text or plain JSON. `null` and blank
/// strings yield `T::default()`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::String(text) if text.trim().is_empty() => Ok(T::default()),
        Value::String(text) => serde_json::from_str(&text).map_err(de::Error::custom),
        other => serde_json::from_value(other).map_err(de::Error::custom),
    }
}

/// Serialize `value` as JSON text, the way the API expects it on writes.
pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let text = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

/// Boolean flag sent as `true`, `1` or `"1"`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => Ok(matches!(s.trim(), "1" | "true" | "TRUE" | "True")),
        other => Err(de::Error::custom(format!("expected a boolean flag, got {}", other))),
    }
}

/// Number sent either as a JSON number or as numeric text.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range")),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s))),
        other => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// Timestamp in RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC). Unparseable values
/// are dropped rather than failing the whole record.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize")]
        skills: Vec<String>,
        #[serde(default, deserialize_with = "flag")]
        favorite: bool,
        #[serde(default, deserialize_with = "number")]
        score: f64,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_skills_as_text_or_array() {
        assert_eq!(probe(r#"{"skills":"[\"Go\",\"Rust\"]"}"#).skills, vec!["Go", "Rust"]);
        assert_eq!(probe(r#"{"skills":["Go"]}"#).skills, vec!["Go"]);
        assert!(probe(r#"{"skills":null}"#).skills.is_empty());
        assert!(probe(r#"{"skills":""}"#).skills.is_empty());
        assert!(probe("{}").skills.is_empty());
    }

    #[test]
    fn test_flag_shapes() {
        assert!(probe(r#"{"favorite":true}"#).favorite);
        assert!(probe(r#"{"favorite":1}"#).favorite);
        assert!(probe(r#"{"favorite":"1"}"#).favorite);
        assert!(!probe(r#"{"favorite":0}"#).favorite);
        assert!(!probe(r#"{"favorite":null}"#).favorite);
    }

    #[test]
    fn test_number_shapes() {
        assert_eq!(probe(r#"{"score":7.5}"#).score, 7.5);
        assert_eq!(probe(r#"{"score":"3"}"#).score, 3.0);
        assert_eq!(probe(r#"{"score":null}"#).score, 0.0);
        assert!(serde_json::from_str::<Probe>(r#"{"score":"abc"}"#).is_err());
    }

    #[test]
    fn test_timestamp_shapes() {
        assert!(probe(r#"{"at":"2025-05-07T10:00:00.000000Z"}"#).at.is_some());
        assert!(probe(r#"{"at":"2025-05-07 10:00:00"}"#).at.is_some());
        assert!(probe(r#"{"at":"yesterday"}"#).at.is_none());
    }

    #[test]
    fn test_serialize_as_text() {
        #[derive(Serialize)]
        struct Out {
            #[serde(serialize_with = "serialize")]
            skills: Vec<String>,
        }
        let out = serde_json::to_string(&Out {
            skills: vec!["Go".into(), "Rust".into()],
        })
        .unwrap();
        assert_eq!(out, r#"{"skills":"[\"Go\",\"Rust\"]"}"#);
    }
}
