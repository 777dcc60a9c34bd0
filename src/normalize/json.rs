//! Lenient accessors over untyped JSON. None of these fail: anything that
//! does not have the expected shape reads as absent.

use crate::models::RecordId;
use serde_json::{Map, Value};

/// Parse a JSON-encoded string. Non-strings, blank strings and malformed
/// JSON give `None`.
pub fn try_json(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if !s.trim().is_empty() => serde_json::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Look a field up under its camelCase name, then its snake_case alias.
/// Null counts as absent.
pub fn field<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel)
        .filter(|v| !v.is_null())
        .or_else(|| obj.get(snake).filter(|v| !v.is_null()))
}

/// A native object, or a string holding one.
pub fn object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        other => match try_json(other) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        },
    }
}

/// A native array, or a string holding one.
pub fn array(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        other => match try_json(other) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
    }
}

/// Display text of a scalar: trimmed strings and numbers. Blank is absent.
pub fn text(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        },
        _ => return None,
    };
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

pub fn text_or_default(value: Option<&Value>) -> String {
    value.and_then(text).unwrap_or_default()
}

/// A number, or a string holding one (thousands separators allowed).
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// String elements of an array, trimmed, blanks dropped.
pub fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-blank trimmed lines of a text block.
pub fn lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// A list of strings given as an array, a JSON array string, or
/// newline-delimited text.
pub fn string_list(value: &Value) -> Vec<String> {
    if let Some(items) = array(value) {
        return strings(&items);
    }
    match value {
        Value::String(s) => lines(s),
        _ => Vec::new(),
    }
}

pub fn record_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => RecordId::Numeric(i),
            None => RecordId::Text(n.to_string()),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.trim().to_string())),
        _ => None,
    }
}
