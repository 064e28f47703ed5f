//! OpenTelemetry-style trace intake endpoints

mod traces;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;

use crate::domain::collector::TraceCollector;

#[derive(Clone)]
pub struct OtlpState {
    pub collector: Arc<dyn TraceCollector>,
}

pub fn routes(collector: Arc<dyn TraceCollector>) -> Router {
    let state = OtlpState { collector };
    Router::new()
        .route("/traces", post(traces::export))
        .with_state(state)
}
