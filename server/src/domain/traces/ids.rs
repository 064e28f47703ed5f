//! Identifier decoding.
//!
//! Trace, span and parent identifiers arrive base64-encoded and are decoded
//! to lower-case hex exactly once per request. Decoding is NOT idempotent:
//! the hex output is itself valid base64, so a second pass scrambles the
//! identifiers. The pipeline therefore runs it once, on a private copy,
//! before grouping.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::wire::ExportRequest;

/// Decode every span identifier in the request, returning the rebuilt
/// request. The caller's original payload is never touched; pass a clone.
pub fn decode_request(mut request: ExportRequest) -> ExportRequest {
    for resource_spans in &mut request.resource_spans {
        for scope_spans in &mut resource_spans.scope_spans {
            for span in &mut scope_spans.spans {
                span.trace_id = decode_id(&span.trace_id);
                span.span_id = decode_id(&span.span_id);
                span.parent_span_id = span
                    .parent_span_id
                    .take()
                    .filter(|id| !id.is_empty())
                    .map(|id| decode_id(&id));
            }
        }
    }
    request
}

/// Base64 → lower-case hex. An undecodable identifier is kept (lower-cased)
/// rather than dropped; structural validation decides whether it is usable.
fn decode_id(encoded: &str) -> String {
    match BASE64.decode(encoded) {
        Ok(bytes) => hex::encode(bytes),
        Err(_) => encoded.to_ascii_lowercase(),
    }
}
