//! Trace normalization engine
//!
//! Converts one wire-format export request into canonical traces:
//!
//! ```text
//! ExportRequest
//!   ──▶ decode ids (private copy)          ids.rs
//!   ──▶ group by distinct trace id         group.rs
//!   ──▶ per span:
//!         expand dotted attributes         expand.rs + value.rs
//!         resolve type / model / io        semantic.rs
//!         extract trace metadata           semantic.rs + metadata.rs
//!         extract error                    error.rs
//!         normalize timestamps             time.rs
//!         fold leftovers into params       semantic.rs
//!   ──▶ Vec<CanonicalTrace>
//! ```
//!
//! The transform is pure, synchronous and stateless: it never mutates its
//! input (id decoding runs on a private copy) and only signals an error for
//! a span missing its identity. Data-quality problems degrade to absent
//! fields instead of failing.

pub mod error;
pub mod expand;
pub mod group;
pub mod ids;
pub mod metadata;
pub mod semantic;
pub mod time;
pub mod types;
pub mod value;
pub mod wire;

use thiserror::Error;

use self::metadata::TraceMetadata;
use self::types::{CanonicalSpan, CanonicalTrace, SpanTimestamps};
use self::wire::{ExportRequest, Scope, WireSpan};

/// Structural validation failure: a trace/span cannot exist without its
/// identity, so this is the one condition that is not silently defaulted.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("span {name:?} is missing a trace id")]
    MissingTraceId { name: String },
    #[error("span {name:?} is missing a span id")]
    MissingSpanId { name: String },
}

/// Convert one export request into canonical traces, one per distinct trace
/// id, preserving span order as encountered. The caller's request is never
/// mutated.
pub fn convert(request: &ExportRequest) -> Result<Vec<CanonicalTrace>, ConvertError> {
    // Id decoding is not idempotent, so it runs exactly once, on a private
    // copy, before anything looks at trace ids.
    let decoded = ids::decode_request(request.clone());
    validate(&decoded)?;

    let mut traces = Vec::new();
    for trace_id in group::distinct_trace_ids(&decoded) {
        let subset = group::filter_for_trace(&decoded, &trace_id);
        traces.push(build_trace(trace_id, &subset));
    }
    Ok(traces)
}

fn validate(request: &ExportRequest) -> Result<(), ConvertError> {
    for span in request.spans() {
        if span.trace_id.is_empty() {
            return Err(ConvertError::MissingTraceId {
                name: span.name.clone(),
            });
        }
        if span.span_id.is_empty() {
            return Err(ConvertError::MissingSpanId {
                name: span.name.clone(),
            });
        }
    }
    Ok(())
}

fn build_trace(trace_id: String, request: &ExportRequest) -> CanonicalTrace {
    let mut meta = TraceMetadata::default();
    meta.custom.extend(group::resource_metadata(request));

    let mut spans = Vec::new();
    for resource_spans in &request.resource_spans {
        for scope_spans in &resource_spans.scope_spans {
            for span in &scope_spans.spans {
                spans.push(build_span(span, scope_spans.scope.as_ref(), &mut meta));
            }
        }
    }

    CanonicalTrace {
        trace_id,
        spans,
        reserved_metadata: meta.reserved,
        custom_metadata: meta.custom,
    }
}

fn build_span(span: &WireSpan, scope: Option<&Scope>, meta: &mut TraceMetadata) -> CanonicalSpan {
    let mut tree = expand::expand_attributes(&span.attributes);

    let span_type = semantic::resolve_type(span.kind.as_ref(), &mut tree);
    let model = semantic::resolve_model(&mut tree);
    let input = semantic::resolve_input(&mut tree, meta);
    let output = semantic::resolve_output(&mut tree);
    semantic::extract_trace_metadata(&mut tree, meta);

    let timestamps = SpanTimestamps {
        started_at: span
            .start_time_unix_nano
            .as_ref()
            .and_then(time::epoch_millis),
        finished_at: span
            .end_time_unix_nano
            .as_ref()
            .and_then(time::epoch_millis),
        first_token_at: time::first_token_millis(&span.events),
    };

    CanonicalSpan {
        span_id: span.span_id.clone(),
        trace_id: span.trace_id.clone(),
        parent_id: span.parent_span_id.clone(),
        name: (!span.name.is_empty()).then(|| span.name.clone()),
        span_type,
        model,
        input,
        output,
        error: error::extract_error(span.status.as_ref(), &span.events),
        params: semantic::assemble_params(tree, scope),
        timestamps,
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
