//! Helpers for loosely typed field values.
//!
//! The server sends field values as whatever JSON type was convenient:
//! ids arrive as numbers or strings, flags as booleans, `"t"`/`"f"` or `1`/`0`.
//! These helpers give the rest of the model one way to read them.

use serde_json::Value;

/// Renders a value as display text.
///
/// Null renders as an empty string and arrays are joined with `", "`.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Returns the string key used to compare ids and label keys.
///
/// `42` and `"42"` produce the same key.
#[must_use]
pub fn value_key(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Returns true for null, the empty string and the empty array.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Normalizes the boolean spellings used on the wire.
///
/// `1`, `"t"` and `"true"` become `true`; `0`, `"f"` and `"false"` become
/// `false`. Everything else is returned unchanged.
#[must_use]
pub fn normalize_bool(value: Value) -> Value {
    let flag = match &value {
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "t" | "true" => Some(true),
            "f" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.map_or(value, Value::Bool)
}
