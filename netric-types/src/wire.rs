//! Normalization of wire payloads.
//!
//! Several payload shapes have changed over time and the server still sends
//! the old spellings (`field` / `field_name`, `system` / `f_system`,
//! `sort_order` / `order_by`, numeric or string ids). Callers resolve these
//! here, once, while reading a payload, instead of checking optional keys
//! throughout the model.

use crate::value::{display_value, is_empty_value, normalize_bool, value_key};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Returns the value of the first key in `keys` that is present in `map`.
///
/// A key holding `null` counts as present.
#[must_use]
pub fn pick<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// Borrows `value` as an object, naming `what` in the error otherwise.
pub fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::InvalidData(format!("{what} must be a JSON object")))
}

/// Reads a flag written as a boolean, `"t"`/`"f"`, `"true"`/`"false"` or `1`/`0`.
#[must_use]
pub fn flag(value: &Value) -> bool {
    match normalize_bool(value.clone()) {
        Value::Bool(b) => b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads an id that may be a number or a string. Null and `""` mean no id.
#[must_use]
pub fn opt_id(value: &Value) -> Option<String> {
    if is_empty_value(value) {
        None
    } else {
        Some(value_key(value))
    }
}

/// Reads optional text. Null means no text.
#[must_use]
pub fn opt_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(display_value(other)),
    }
}

/// Reads an integer that may be sent as a number or a numeric string.
#[must_use]
pub fn opt_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Serde adapter for ids sent either as numbers or strings.
///
/// Use with `#[serde(default, deserialize_with = "netric_types::wire::lenient_id")]`.
pub fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(opt_id(&value))
}

/// Serde adapter for flags sent in any of the spellings accepted by [`flag`].
pub fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(flag(&value))
}

/// Serde adapter for counts sent either as numbers or numeric strings.
pub fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(opt_i64(&value).map_or(0, |n| n.max(0) as u64))
}

/// Serde adapter for text that may arrive as null or as a number.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(opt_string(&value).unwrap_or_default())
}

/// Serde adapter for signed integers sent as numbers or numeric strings.
pub fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(opt_i64(&value).unwrap_or_default())
}
