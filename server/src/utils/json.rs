//! JSON utility functions

use serde_json::{Map as JsonMap, Value as JsonValue};

/// Recursively strip nulls and empty maps/arrays. Returns None when nothing
/// survives, so callers can drop the key entirely.
pub fn prune_empty(value: JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Null => None,
        JsonValue::Object(map) => {
            let pruned: JsonMap<String, JsonValue> = map
                .into_iter()
                .filter_map(|(key, child)| prune_empty(child).map(|kept| (key, kept)))
                .collect();
            (!pruned.is_empty()).then_some(JsonValue::Object(pruned))
        }
        JsonValue::Array(items) => {
            let pruned: Vec<JsonValue> = items.into_iter().filter_map(prune_empty).collect();
            (!pruned.is_empty()).then_some(JsonValue::Array(pruned))
        }
        other => Some(other),
    }
}
