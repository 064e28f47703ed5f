//! End-to-end tests for the conversion pipeline

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value as JsonValue, json};

use super::types::SpanType;
use super::*;

const TRACE_A: [u8; 16] = [0xAB; 16];
const TRACE_B: [u8; 16] = [0xBC; 16];
const SPAN_1: [u8; 8] = [0x01; 8];
const SPAN_2: [u8; 8] = [0x02; 8];

fn b64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn request_from(value: JsonValue) -> ExportRequest {
    serde_json::from_value(value).expect("test request should deserialize")
}

/// One resource group, one scope, spans as given.
fn single_group(spans: JsonValue) -> ExportRequest {
    request_from(json!({
        "resourceSpans": [{
            "resource": { "attributes": [
                { "key": "service.name", "value": { "stringValue": "chat-bot" } },
                { "key": "telemetry.sdk.language", "value": { "stringValue": "python" } },
            ] },
            "scopeSpans": [{
                "scope": { "name": "openinference.instrumentation.openai", "version": "0.1.12" },
                "spans": spans,
            }]
        }]
    }))
}

fn span_json(trace: &[u8], span: &[u8], attributes: JsonValue) -> JsonValue {
    json!({
        "traceId": b64(trace),
        "spanId": b64(span),
        "name": "ChatCompletion",
        "kind": 3,
        "startTimeUnixNano": "1700000000000000000",
        "endTimeUnixNano": "1700000001500000000",
        "attributes": attributes,
    })
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_llm_span() {
    let request = single_group(json!([span_json(
        &TRACE_A,
        &SPAN_1,
        json!([
            { "key": "llm.model_name", "value": { "stringValue": "gpt-4" } },
            { "key": "llm.request.type", "value": { "stringValue": "chat" } },
        ])
    )]));

    let traces = convert(&request).unwrap();
    assert_eq!(traces.len(), 1);
    let span = &traces[0].spans[0];
    assert_eq!(span.span_type, SpanType::Llm);
    assert_eq!(span.model.as_deref(), Some("gpt-4"));
}

#[test]
fn test_scenario_two_traces_split() {
    let request = single_group(json!([
        span_json(&TRACE_A, &SPAN_1, json!([])),
        span_json(&TRACE_B, &SPAN_2, json!([])),
    ]));

    let traces = convert(&request).unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].trace_id, hex(&TRACE_A));
    assert_eq!(traces[1].trace_id, hex(&TRACE_B));
    for trace in &traces {
        assert_eq!(trace.spans.len(), 1);
        assert!(trace.spans.iter().all(|s| s.trace_id == trace.trace_id));
    }
}

// ============================================================================
// IDENTIFIERS AND PURITY
// ============================================================================

#[test]
fn test_ids_decoded_to_hex_exactly_once() {
    let request = single_group(json!([span_json(&TRACE_A, &SPAN_1, json!([]))]));
    let traces = convert(&request).unwrap();
    let span = &traces[0].spans[0];
    assert_eq!(span.trace_id, hex(&TRACE_A));
    assert_eq!(span.span_id, hex(&SPAN_1));
    assert_eq!(span.parent_id, None);

    // The caller's request is untouched: ids are still base64
    assert_eq!(request.spans().next().unwrap().trace_id, b64(&TRACE_A));
}

#[test]
fn test_convert_is_repeatable() {
    let request = single_group(json!([span_json(
        &TRACE_A,
        &SPAN_1,
        json!([{ "key": "llm.model_name", "value": { "stringValue": "gpt-4" } }])
    )]));

    let first = serde_json::to_value(convert(&request).unwrap()).unwrap();
    let second = serde_json::to_value(convert(&request).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_identity_is_an_error() {
    let request = request_from(json!({
        "resourceSpans": [{ "scopeSpans": [{ "spans": [{ "spanId": b64(&SPAN_1), "name": "orphan" }] }] }]
    }));
    assert!(matches!(
        convert(&request),
        Err(ConvertError::MissingTraceId { .. })
    ));

    let request = request_from(json!({
        "resourceSpans": [{ "scopeSpans": [{ "spans": [{ "traceId": b64(&TRACE_A) }] }] }]
    }));
    assert!(matches!(
        convert(&request),
        Err(ConvertError::MissingSpanId { .. })
    ));
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

#[test]
fn test_timestamps_normalized_to_millis() {
    let mut span = span_json(&TRACE_A, &SPAN_1, json!([]));
    span["events"] = json!([{
        "name": "first_token",
        "timeUnixNano": "1700000000700000000",
    }]);
    let request = single_group(json!([span]));

    let traces = convert(&request).unwrap();
    let timestamps = &traces[0].spans[0].timestamps;
    assert_eq!(timestamps.started_at, Some(1_700_000_000_000));
    assert_eq!(timestamps.finished_at, Some(1_700_000_001_500));
    assert_eq!(timestamps.first_token_at, Some(1_700_000_000_700));
}

#[test]
fn test_absent_end_time_stays_absent() {
    let request = single_group(json!([{
        "traceId": b64(&TRACE_A),
        "spanId": b64(&SPAN_1),
        "name": "open-ended",
        "startTimeUnixNano": "1700000000000000000",
    }]));
    let traces = convert(&request).unwrap();
    assert_eq!(traces[0].spans[0].timestamps.finished_at, None);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_error_from_status_code() {
    let mut span = span_json(&TRACE_A, &SPAN_1, json!([]));
    span["status"] = json!({ "code": 2, "message": "boom" });
    let request = single_group(json!([span]));

    let traces = convert(&request).unwrap();
    let error = traces[0].spans[0].error.as_ref().unwrap();
    assert!(error.has_error);
    assert_eq!(error.message, "boom");
    assert!(error.stacktrace.is_empty());
}

// ============================================================================
// METADATA
// ============================================================================

#[test]
fn test_resource_attributes_flow_into_custom_metadata() {
    let request = single_group(json!([span_json(&TRACE_A, &SPAN_1, json!([]))]));
    let traces = convert(&request).unwrap();
    let custom = &traces[0].custom_metadata;
    assert_eq!(custom.get("service.name"), Some(&json!("chat-bot")));
    assert_eq!(custom.get("telemetry.sdk.language"), Some(&json!("python")));
}

#[test]
fn test_session_attributes_fill_reserved_metadata() {
    let request = single_group(json!([span_json(
        &TRACE_A,
        &SPAN_1,
        json!([
            { "key": "user.id", "value": { "stringValue": "user-1" } },
            { "key": "session.id", "value": { "stringValue": "sess-9" } },
        ])
    )]));
    let traces = convert(&request).unwrap();
    let reserved = &traces[0].reserved_metadata;
    assert_eq!(reserved.get("user_id"), Some(&json!("user-1")));
    assert_eq!(reserved.get("thread_id"), Some(&json!("sess-9")));
    // Consumed attributes never reach params
    assert!(!traces[0].spans[0].params.contains_key("user"));
    assert!(!traces[0].spans[0].params.contains_key("session"));
}

#[test]
fn test_nested_input_metadata_splits_reserved_from_custom() {
    let entity_input =
        "{\"question\": \"hi\", \"metadata\": {\"user_id\": \"user-7\", \"experiment\": \"B\"}}";
    let request = single_group(json!([span_json(
        &TRACE_A,
        &SPAN_1,
        json!([
            { "key": "traceloop.entity.input", "value": { "stringValue": entity_input } },
        ])
    )]));

    let traces = convert(&request).unwrap();
    let trace = &traces[0];
    assert_eq!(trace.reserved_metadata.get("user_id"), Some(&json!("user-7")));
    assert_eq!(trace.custom_metadata.get("experiment"), Some(&json!("B")));
    // Neither half leaks into params, and the payload lost its metadata key
    let span = &trace.spans[0];
    assert!(!span.params.contains_key("traceloop"));
    let input = serde_json::to_value(span.input.as_ref().unwrap()).unwrap();
    assert_eq!(input, json!({ "type": "json", "value": { "question": "hi" } }));
}

// ============================================================================
// LOSSLESSNESS
// ============================================================================

#[test]
fn test_unrecognized_attributes_survive_in_params() {
    let request = single_group(json!([span_json(
        &TRACE_A,
        &SPAN_1,
        json!([
            { "key": "vendor.custom.flag", "value": { "boolValue": true } },
            { "key": "retries", "value": { "intValue": 3 } },
        ])
    )]));

    let traces = convert(&request).unwrap();
    let params = &traces[0].spans[0].params;
    assert_eq!(params.get("vendor"), Some(&json!({ "custom": { "flag": true } })));
    assert_eq!(params.get("retries"), Some(&json!(3)));
    // The scope rides along with params
    assert_eq!(
        params.get("scope"),
        Some(&json!({
            "name": "openinference.instrumentation.openai",
            "version": "0.1.12",
        }))
    );
}

#[test]
fn test_kind_maps_to_type_when_nothing_overrides() {
    let request = single_group(json!([span_json(&TRACE_A, &SPAN_1, json!([]))]));
    let traces = convert(&request).unwrap();
    // kind: 3 is a client span
    assert_eq!(traces[0].spans[0].span_type, SpanType::Client);
}

#[test]
fn test_span_name_kept() {
    let request = single_group(json!([span_json(&TRACE_A, &SPAN_1, json!([]))]));
    let traces = convert(&request).unwrap();
    assert_eq!(traces[0].spans[0].name.as_deref(), Some("ChatCompletion"));
}
