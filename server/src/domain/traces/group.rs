//! Trace grouping.
//!
//! One export request may interleave spans from unrelated traces. Grouping
//! partitions the (already id-decoded) request into one canonical trace per
//! distinct trace id, keeping only the resource groups that contain at
//! least one matching span.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::value::decode_value;
use super::wire::{ExportRequest, ResourceSpans, ScopeSpans};

/// Distinct trace ids in encounter order.
pub fn distinct_trace_ids(request: &ExportRequest) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for span in request.spans() {
        if !ids.iter().any(|id| id == &span.trace_id) {
            ids.push(span.trace_id.clone());
        }
    }
    ids
}

/// Narrow a request down to the resource groups and spans of one trace.
pub fn filter_for_trace(request: &ExportRequest, trace_id: &str) -> ExportRequest {
    let resource_spans = request
        .resource_spans
        .iter()
        .filter_map(|resource_spans| {
            let scope_spans: Vec<ScopeSpans> = resource_spans
                .scope_spans
                .iter()
                .filter_map(|scope_spans| {
                    let spans: Vec<_> = scope_spans
                        .spans
                        .iter()
                        .filter(|span| span.trace_id == trace_id)
                        .cloned()
                        .collect();
                    (!spans.is_empty()).then(|| ScopeSpans {
                        scope: scope_spans.scope.clone(),
                        spans,
                    })
                })
                .collect();
            (!scope_spans.is_empty()).then(|| ResourceSpans {
                resource: resource_spans.resource.clone(),
                scope_spans,
            })
        })
        .collect();
    ExportRequest { resource_spans }
}

/// Resource-level attributes contribute to the trace's custom metadata,
/// flattened one level: dotted keys stay dotted, values are decoded.
pub fn resource_metadata(request: &ExportRequest) -> JsonMap<String, JsonValue> {
    let mut metadata = JsonMap::new();
    for resource_spans in &request.resource_spans {
        if let Some(resource) = &resource_spans.resource {
            for attribute in &resource.attributes {
                metadata.insert(
                    attribute.key.clone(),
                    decode_value(attribute.value.as_ref()),
                );
            }
        }
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traces::wire::{AnyValue, KeyValue, Resource, WireSpan};
    use serde_json::json;

    fn span(trace_id: &str, span_id: &str) -> WireSpan {
        WireSpan {
            trace_id: trace_id.to_string(),
            span_id: span_id.to_string(),
            ..WireSpan::default()
        }
    }

    fn request(groups: Vec<(Option<&str>, Vec<WireSpan>)>) -> ExportRequest {
        ExportRequest {
            resource_spans: groups
                .into_iter()
                .map(|(service, spans)| ResourceSpans {
                    resource: service.map(|name| Resource {
                        attributes: vec![KeyValue {
                            key: "service.name".to_string(),
                            value: Some(AnyValue::StringValue(name.to_string())),
                        }],
                    }),
                    scope_spans: vec![ScopeSpans { scope: None, spans }],
                })
                .collect(),
        }
    }

    #[test]
    fn test_distinct_ids_in_encounter_order() {
        let request = request(vec![(
            None,
            vec![span("bbb", "1"), span("aaa", "2"), span("bbb", "3")],
        )]);
        assert_eq!(distinct_trace_ids(&request), vec!["bbb", "aaa"]);
    }

    #[test]
    fn test_filter_keeps_only_matching_spans() {
        let request = request(vec![
            (Some("svc-a"), vec![span("t1", "1"), span("t2", "2")]),
            (Some("svc-b"), vec![span("t2", "3")]),
        ]);
        let filtered = filter_for_trace(&request, "t2");
        assert_eq!(filtered.resource_spans.len(), 2);
        assert_eq!(filtered.spans().count(), 2);
        assert!(filtered.spans().all(|s| s.trace_id == "t2"));

        let filtered = filter_for_trace(&request, "t1");
        // The second resource group has no t1 spans and is dropped entirely
        assert_eq!(filtered.resource_spans.len(), 1);
        assert_eq!(filtered.spans().count(), 1);
    }

    #[test]
    fn test_resource_metadata_flattened_one_level() {
        let request = request(vec![(Some("chat-bot"), vec![span("t1", "1")])]);
        let metadata = resource_metadata(&request);
        // Dotted keys stay dotted, no tree expansion at the resource level
        assert_eq!(metadata.get("service.name"), Some(&json!("chat-bot")));
    }
}
