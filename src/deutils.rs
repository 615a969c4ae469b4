// src/deutils.rs
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept any JSON number; absent, null, strings, bools etc. become None.
///
/// Readings that are not numbers render as a placeholder instead of
/// failing the whole record.
pub fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(Value::as_f64).filter(|n| n.is_finite()))
}

/// Accept a string, treating null and non-string values as absent.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
