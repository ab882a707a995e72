//! Small helpers over `serde_json::Value`.

use serde_json::Value;

/// Returns true when a value counts as "not supplied".
///
/// Null, `false`, zero, the empty string and empty arrays/objects are all
/// treated as absent. Both the request builders and the result shaper use
/// this to decide whether an optional part is emitted.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Returns the value when present and not empty.
pub fn non_empty(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_empty_value(v))
}

/// Renders a scalar as a document id.
///
/// Strings are used verbatim and numbers use their JSON rendering. Anything
/// else (including the empty string) is not a usable id.
pub fn scalar_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
