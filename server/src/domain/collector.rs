//! Collector seam for canonical traces.
//!
//! The normalization engine produces canonical traces and immediately hands
//! them off; everything past that point (queueing, persistence, indexing)
//! lives behind this trait. The bundled implementation is a bounded
//! in-memory buffer, which is what the local workbench and the tests use.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use super::traces::types::CanonicalTrace;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("collector unavailable: {0}")]
    Unavailable(String),
}

/// Downstream hand-off for converted traces.
#[async_trait]
pub trait TraceCollector: Send + Sync {
    async fn collect(&self, traces: Vec<CanonicalTrace>) -> Result<(), CollectorError>;
}

/// A collected trace with its arrival time.
#[derive(Debug, Clone)]
pub struct CollectedTrace {
    pub received_at: DateTime<Utc>,
    pub trace: CanonicalTrace,
}

/// Bounded in-memory collector. The oldest trace is dropped once the buffer
/// is full.
pub struct MemoryCollector {
    capacity: usize,
    buffer: Mutex<VecDeque<CollectedTrace>>,
}

impl MemoryCollector {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of traces currently buffered.
    pub async fn len(&self) -> usize {
        self.buffer.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buffer.lock().await.is_empty()
    }

    /// Remove and return everything buffered so far, oldest first.
    pub async fn drain(&self) -> Vec<CollectedTrace> {
        self.buffer.lock().await.drain(..).collect()
    }
}

#[async_trait]
impl TraceCollector for MemoryCollector {
    async fn collect(&self, traces: Vec<CanonicalTrace>) -> Result<(), CollectorError> {
        let mut buffer = self.buffer.lock().await;
        for trace in traces {
            if buffer.len() == self.capacity {
                if let Some(dropped) = buffer.pop_front() {
                    tracing::warn!(
                        trace_id = %dropped.trace.trace_id,
                        capacity = self.capacity,
                        "Collector buffer full, dropping oldest trace"
                    );
                }
            }
            tracing::debug!(trace_id = %trace.trace_id, spans = trace.spans.len(), "Collected trace");
            buffer.push_back(CollectedTrace {
                received_at: Utc::now(),
                trace,
            });
        }
        Ok(())
    }
}
