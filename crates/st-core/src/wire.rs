//! Serde helpers for fields the server sends in more than one shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Identifiers arrive as strings or integers; hold them as strings.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Option::<Value>::deserialize(deserializer)?))
}

pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id(deserializer).map(Option::unwrap_or_default)
}

/// Free text that may arrive as a string, a structured value, or null.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id(deserializer)
}

fn value_to_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
