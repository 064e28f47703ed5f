//! Attribute path expansion.
//!
//! Producers encode nested structure as flat dotted keys
//! (`llm.input_messages.0.message.role`) because the wire format has no
//! native arrays at the attribute level. Expansion rebuilds the tree:
//! dotted keys become nested maps, and any map whose keys are all numeric
//! collapses into a sequence ordered by the numeric key, not by insertion
//! order.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::value::decode_value;
use super::wire::KeyValue;

/// Expand a flat list of dotted-key attributes into one nested tree.
pub fn expand_attributes(attributes: &[KeyValue]) -> JsonMap<String, JsonValue> {
    let mut root = JsonMap::new();
    for attribute in attributes {
        if attribute.key.is_empty() {
            continue;
        }
        insert_path(
            &mut root,
            &attribute.key,
            decode_value(attribute.value.as_ref()),
        );
    }
    root.into_iter()
        .map(|(key, value)| (key, collapse_numeric(value)))
        .collect()
}

/// Insert a value at a dotted path, creating intermediate maps as needed.
/// A scalar sitting in the way of a longer path is replaced rather than
/// raising an error.
fn insert_path(map: &mut JsonMap<String, JsonValue>, path: &str, value: JsonValue) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| JsonValue::Object(JsonMap::new()));
            if !entry.is_object() {
                *entry = JsonValue::Object(JsonMap::new());
            }
            if let JsonValue::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Collapse maps whose keys are all numeric into sequences ordered by the
/// numeric key value. This is how the wire format encodes arrays.
fn collapse_numeric(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let collapsed: JsonMap<String, JsonValue> = map
                .into_iter()
                .map(|(key, child)| (key, collapse_numeric(child)))
                .collect();
            if collapsed.is_empty() || !collapsed.keys().all(|key| is_numeric(key)) {
                return JsonValue::Object(collapsed);
            }
            let mut entries: Vec<(u64, JsonValue)> = collapsed
                .into_iter()
                .filter_map(|(key, child)| key.parse::<u64>().ok().map(|index| (index, child)))
                .collect();
            entries.sort_by_key(|(index, _)| *index);
            JsonValue::Array(entries.into_iter().map(|(_, child)| child).collect())
        }
        other => other,
    }
}

fn is_numeric(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
