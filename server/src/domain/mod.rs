//! Domain logic for trace normalization
//!
//! - `collector` - downstream hand-off seam for canonical traces
//! - `traces` - the normalization engine (wire request → canonical traces)

pub mod collector;
pub mod traces;

pub use collector::{CollectorError, MemoryCollector, TraceCollector};
pub use traces::{ConvertError, convert};
