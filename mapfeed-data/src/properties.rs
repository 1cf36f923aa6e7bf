//! Scalar property access shared by both payload formats.

use serde_json::{Map, Value};

/// Read an attribute as text. Numbers are rendered in decimal.
pub(crate) fn attribute_text(attributes: &Map<String, Value>, key: &str) -> Result<String, String> {
    match attributes.get(key) {
        Some(Value::String(text)) => Ok(text.trim().to_owned()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(Value::Null) | None => Err(format!("attribute `{key}` missing")),
        Some(other) => Err(format!("attribute `{key}` is not a scalar: {other}")),
    }
}
