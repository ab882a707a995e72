//! Index lifecycle request bodies.

use serde_json::{Map, Value, json};

use crate::json::is_empty_value;

/// Settings that cannot change once an index exists.
const IMMUTABLE_SETTINGS: &[&str] = &["number_of_shards"];

/// Builds the body of a create-index request.
///
/// `settings` falls back to `default_settings` when absent or empty; `mappings`
/// is only included when it carries something.
pub fn create_index_body(
    settings: Option<Value>,
    mappings: Option<Value>,
    default_settings: Value,
) -> Value {
    let settings = settings
        .filter(|s| !is_empty_value(s))
        .unwrap_or(default_settings);

    let mut body = json!({ "settings": settings });
    if let Some(mappings) = mappings.filter(|m| !is_empty_value(m)) {
        body["mappings"] = mappings;
    }
    body
}

/// Default settings for a new index.
pub fn default_index_settings(number_of_shards: u32, number_of_replicas: u32) -> Value {
    json!({
        "number_of_shards": number_of_shards,
        "number_of_replicas": number_of_replicas
    })
}

/// Removes settings that must never be re-sent to an existing index.
///
/// Handles both the flat form (`{"number_of_shards": 2}`) and the nested
/// form (`{"index": {"number_of_shards": 2}}`).
pub fn strip_immutable_settings(mut settings: Value) -> Value {
    if let Some(obj) = settings.as_object_mut() {
        remove_keys(obj);
        if let Some(index) = obj.get_mut("index").and_then(Value::as_object_mut) {
            remove_keys(index);
        }
    }
    settings
}

fn remove_keys(obj: &mut Map<String, Value>) {
    for key in IMMUTABLE_SETTINGS {
        obj.shift_remove(*key);
    }
}

/// Alias action kinds for `_aliases`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasAction {
    /// Point the alias at the index.
    Add,
    /// Detach the alias from the index.
    Remove,
}

impl AliasAction {
    fn as_str(self) -> &'static str {
        match self {
            AliasAction::Add => "add",
            AliasAction::Remove => "remove",
        }
    }
}

/// Builds an `_aliases` body with a single action.
pub fn alias_actions_body(action: AliasAction, index: &str, alias: &str) -> Value {
    let kind = action.as_str();
    json!({
        "actions": [
            { kind: { "index": index, "alias": alias } }
        ]
    })
}
