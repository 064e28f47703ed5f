//! Semantic mapping.
//!
//! Classifies one span's type, model, input, output and params from the
//! expanded attribute tree, and contributes trace-level metadata. Rules are
//! ordered tables over vendor attribute paths; every attribute a rule uses
//! is removed from the tree so no value can surface twice. Whatever no
//! convention recognizes stays in the tree and folds into `params`.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::metadata::TraceMetadata;
use super::types::{ChatMessage, SpanType, TypedValue};
use super::value::decode_value;
use super::wire::{Scope, WireEnum};
use crate::utils::json::prune_empty;
use crate::utils::string::parse_string_array;

// ============================================================================
// VENDOR ATTRIBUTE PATHS
// ============================================================================

mod paths {
    /// Vendor span-kind attributes in precedence order; a later match
    /// overwrites an earlier one.
    pub const SPAN_KIND: &[&[&str]] = &[
        &["openinference", "span", "kind"],
        &["traceloop", "span", "kind"],
    ];
    pub const REQUEST_TYPE: &[&str] = &["llm", "request", "type"];

    /// Model attributes in precedence order; the LAST present one wins.
    pub const MODEL: &[&[&str]] = &[
        &["gen_ai", "request", "model"],
        &["llm", "model_name"],
        &["gen_ai", "response", "model"],
    ];

    pub const INPUT_MESSAGES: &[&str] = &["llm", "input_messages"];
    pub const OUTPUT_MESSAGES: &[&str] = &["llm", "output_messages"];
    pub const PROMPT: &[&str] = &["gen_ai", "prompt"];
    pub const COMPLETION: &[&str] = &["gen_ai", "completion"];
    pub const ENTITY_INPUT: &[&str] = &["traceloop", "entity", "input"];
    pub const ENTITY_OUTPUT: &[&str] = &["traceloop", "entity", "output"];
    pub const INPUT_VALUE: &[&str] = &["input", "value"];
    pub const OUTPUT_VALUE: &[&str] = &["output", "value"];

    pub const USER_ID: &[&str] = &["user", "id"];
    pub const SESSION_ID: &[&str] = &["session", "id"];
    pub const TAGS: &[&str] = &["tags"];
    pub const METADATA: &[&str] = &["metadata"];

    pub const INVOCATION_PARAMETERS: &[&str] = &["llm", "invocation_parameters"];
    pub const IS_STREAMING: &[&str] = &["llm", "is_streaming"];
}

// ============================================================================
// TREE ACCESS
// ============================================================================

/// Read a nested path without removing it.
fn get_path<'a>(tree: &'a JsonMap<String, JsonValue>, path: &[&str]) -> Option<&'a JsonValue> {
    let (first, rest) = path.split_first()?;
    let mut current = tree.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Remove and return the value at a nested path. Emptied intermediate maps
/// are cleaned up by the final params pruning, not here.
fn take_path(tree: &mut JsonMap<String, JsonValue>, path: &[&str]) -> Option<JsonValue> {
    match path {
        [] => None,
        [leaf] => tree.remove(*leaf),
        [head, rest @ ..] => {
            let child = tree.get_mut(*head)?.as_object_mut()?;
            take_path(child, rest)
        }
    }
}

// ============================================================================
// TYPE RESOLUTION
// ============================================================================

/// Resolve the span type. Rules run in order and a later match overwrites
/// an earlier one; `llm.request.type` of chat/completion forces `llm` last.
pub fn resolve_type(kind: Option<&WireEnum>, tree: &mut JsonMap<String, JsonValue>) -> SpanType {
    let mut span_type = SpanType::default();

    if let Some(kind_type) = kind.and_then(kind_to_type) {
        span_type = kind_type;
    }

    for path in paths::SPAN_KIND {
        let matched = get_path(tree, path)
            .and_then(JsonValue::as_str)
            .and_then(|s| SpanType::parse(&s.to_lowercase()));
        if let Some(vendor_type) = matched {
            take_path(tree, path);
            span_type = vendor_type;
        }
    }

    let request_type = get_path(tree, paths::REQUEST_TYPE).and_then(JsonValue::as_str);
    if matches!(request_type, Some("chat") | Some("completion")) {
        take_path(tree, paths::REQUEST_TYPE);
        span_type = SpanType::Llm;
    }

    span_type
}

/// Map the wire span-kind enum onto the canonical types that mirror it.
fn kind_to_type(kind: &WireEnum) -> Option<SpanType> {
    match kind {
        WireEnum::Number(2) => Some(SpanType::Server),
        WireEnum::Number(3) => Some(SpanType::Client),
        WireEnum::Number(4) => Some(SpanType::Producer),
        WireEnum::Number(5) => Some(SpanType::Consumer),
        WireEnum::Number(_) => None,
        WireEnum::Name(name) => match name.as_str() {
            "SPAN_KIND_SERVER" => Some(SpanType::Server),
            "SPAN_KIND_CLIENT" => Some(SpanType::Client),
            "SPAN_KIND_PRODUCER" => Some(SpanType::Producer),
            "SPAN_KIND_CONSUMER" => Some(SpanType::Consumer),
            _ => None,
        },
    }
}

// ============================================================================
// MODEL RESOLUTION
// ============================================================================

/// Resolve the model name. Every present attribute in the table overwrites
/// the previous value: the last match wins, not the first. Downstream
/// pins this ordering; keep the table stable.
pub fn resolve_model(tree: &mut JsonMap<String, JsonValue>) -> Option<String> {
    let mut model = None;
    for path in paths::MODEL {
        let matched = get_path(tree, path)
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        if let Some(name) = matched {
            take_path(tree, path);
            model = Some(name);
        }
    }
    model
}

// ============================================================================
// INPUT / OUTPUT RESOLUTION
// ============================================================================

/// Resolve the span input. Strategies run in order until one succeeds; a
/// strategy whose source is absent, malformed, or fails chat-message schema
/// validation is skipped, leaving its attribute in the tree.
pub fn resolve_input(
    tree: &mut JsonMap<String, JsonValue>,
    meta: &mut TraceMetadata,
) -> Option<TypedValue> {
    if let Some(messages) = take_chat_messages(tree, paths::INPUT_MESSAGES) {
        return Some(TypedValue::ChatMessages(messages));
    }
    if let Some(messages) = take_chat_messages(tree, paths::PROMPT) {
        return Some(TypedValue::ChatMessages(messages));
    }
    if let Some(value) = take_entity_input(tree, meta) {
        return Some(value);
    }
    if let Some(value) = take_path(tree, paths::INPUT_VALUE) {
        return Some(typed_from_value(value));
    }
    None
}

/// Resolve the span output; same strategy ladder as the input side, minus
/// the metadata split.
pub fn resolve_output(tree: &mut JsonMap<String, JsonValue>) -> Option<TypedValue> {
    if let Some(messages) = take_chat_messages(tree, paths::OUTPUT_MESSAGES) {
        return Some(TypedValue::ChatMessages(messages));
    }
    if let Some(messages) = take_chat_messages(tree, paths::COMPLETION) {
        return Some(TypedValue::ChatMessages(messages));
    }
    if let Some(value) = take_path(tree, paths::ENTITY_OUTPUT) {
        return Some(typed_from_value(value));
    }
    if let Some(value) = take_path(tree, paths::OUTPUT_VALUE) {
        return Some(typed_from_value(value));
    }
    None
}

/// Free-form entity input. When the payload is a JSON object carrying a
/// nested `metadata` map, that metadata is split into the trace's
/// reserved/custom maps and stripped from the payload.
fn take_entity_input(
    tree: &mut JsonMap<String, JsonValue>,
    meta: &mut TraceMetadata,
) -> Option<TypedValue> {
    let mut value = take_path(tree, paths::ENTITY_INPUT)?;
    if let JsonValue::Object(payload) = &mut value {
        match payload.remove("metadata") {
            Some(JsonValue::Object(metadata)) => meta.merge_split(metadata),
            Some(other) => {
                payload.insert("metadata".to_string(), other);
            }
            None => {}
        }
    }
    Some(typed_from_value(value))
}

/// Plain strings are `text`; anything else is `json`.
fn typed_from_value(value: JsonValue) -> TypedValue {
    match value {
        JsonValue::String(s) => TypedValue::Text(s),
        other => TypedValue::Json(other),
    }
}

/// Validate a candidate chat-message list; only on success is the source
/// attribute removed from the tree. Elements may be wrapped in a `message`
/// object, as one convention flattens them.
fn take_chat_messages(
    tree: &mut JsonMap<String, JsonValue>,
    path: &[&str],
) -> Option<Vec<ChatMessage>> {
    let candidate = get_path(tree, path)?;
    let messages = validate_chat_messages(candidate)?;
    take_path(tree, path);
    Some(messages)
}

fn validate_chat_messages(value: &JsonValue) -> Option<Vec<ChatMessage>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    let mut messages = Vec::with_capacity(items.len());
    for item in items {
        let unwrapped = match item.get("message") {
            Some(inner @ JsonValue::Object(_)) => inner,
            _ => item,
        };
        if !unwrapped.is_object() {
            return None;
        }
        messages.push(serde_json::from_value(unwrapped.clone()).ok()?);
    }
    Some(messages)
}

// ============================================================================
// TRACE METADATA
// ============================================================================

/// Move explicit metadata attributes off the span tree into the trace's
/// reserved/custom maps.
pub fn extract_trace_metadata(tree: &mut JsonMap<String, JsonValue>, meta: &mut TraceMetadata) {
    if let Some(user_id) = take_path(tree, paths::USER_ID) {
        meta.reserved.insert("user_id".to_string(), user_id);
    }
    // Session ids map onto the canonical "thread" concept.
    if let Some(session_id) = take_path(tree, paths::SESSION_ID) {
        meta.reserved.insert("thread_id".to_string(), session_id);
    }
    if let Some(labels) = get_path(tree, paths::TAGS).and_then(labels_from_tags) {
        take_path(tree, paths::TAGS);
        meta.reserved.insert(
            "labels".to_string(),
            JsonValue::Array(labels.into_iter().map(JsonValue::String).collect()),
        );
    }
    if get_path(tree, paths::METADATA).is_some_and(JsonValue::is_object) {
        if let Some(JsonValue::Object(map)) = take_path(tree, paths::METADATA) {
            meta.custom.extend(map);
        }
    }
}

/// Tag lists arrive as native arrays or as comma/JSON string lists.
fn labels_from_tags(tags: &JsonValue) -> Option<Vec<String>> {
    match tags {
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        JsonValue::String(s) => Some(parse_string_array(s)),
        _ => None,
    }
}

// ============================================================================
// PARAMS ASSEMBLY
// ============================================================================

/// Fold invocation parameters, the streaming flag, the pruned remainder of
/// the tree, and the instrumentation scope into the open params map.
pub fn assemble_params(
    mut tree: JsonMap<String, JsonValue>,
    scope: Option<&Scope>,
) -> JsonMap<String, JsonValue> {
    let mut params = JsonMap::new();

    match take_path(&mut tree, paths::INVOCATION_PARAMETERS) {
        Some(JsonValue::Object(map)) => params.extend(map),
        Some(other) => {
            params.insert("invocation_parameters".to_string(), other);
        }
        None => {}
    }

    if let Some(flag) = take_path(&mut tree, paths::IS_STREAMING) {
        params.insert("stream".to_string(), JsonValue::Bool(coerce_bool(&flag)));
    }

    for (key, value) in tree {
        if let Some(kept) = prune_empty(value) {
            params.insert(key, kept);
        }
    }

    if let Some(scope) = scope {
        params.insert("scope".to_string(), scope_json(scope));
    }

    params
}

/// Boolean coercion for streaming flags; the literal strings `"false"` and
/// `"False"` mean false.
fn coerce_bool(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => !(s.is_empty() || s == "false" || s == "False"),
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::Null => false,
        _ => true,
    }
}

/// Scope identity kept alongside params so the producing library stays
/// attributable.
fn scope_json(scope: &Scope) -> JsonValue {
    let mut map = JsonMap::new();
    if let Some(name) = &scope.name {
        map.insert("name".to_string(), JsonValue::String(name.clone()));
    }
    if let Some(version) = &scope.version {
        map.insert("version".to_string(), JsonValue::String(version.clone()));
    }
    if !scope.attributes.is_empty() {
        let attributes: JsonMap<String, JsonValue> = scope
            .attributes
            .iter()
            .map(|kv| (kv.key.clone(), decode_value(kv.value.as_ref())))
            .collect();
        map.insert("attributes".to_string(), JsonValue::Object(attributes));
    }
    JsonValue::Object(map)
}

#[cfg(test)]
#[path = "semantic_tests.rs"]
mod tests;
