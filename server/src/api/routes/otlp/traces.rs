//! Traces export endpoint

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::OtlpState;
use crate::domain::traces::{self, wire::ExportRequest};

pub async fn export(State(state): State<OtlpState>, body: Bytes) -> Response {
    // Parse the JSON wire encoding
    let request: ExportRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed trace export body");
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Invalid trace export request: {e}"),
            )
                .into_response();
        }
    };

    // Normalize into canonical traces
    let converted = match traces::convert(&request) {
        Ok(converted) => converted,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected structurally invalid trace export");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                [(header::CONTENT_TYPE, "text/plain")],
                e.to_string(),
            )
                .into_response();
        }
    };

    // Hand off to the collector
    let trace_count = converted.len();
    let span_count: usize = converted.iter().map(|t| t.spans.len()).sum();
    if let Err(e) = state.collector.collect(converted).await {
        tracing::warn!(error = %e, "Failed to hand traces to collector");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    tracing::debug!(traces = trace_count, spans = span_count, "Accepted trace export");
    Json(json!({ "partialSuccess": {} })).into_response()
}
