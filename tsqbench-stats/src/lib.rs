#![warn(missing_docs)]
//! tsqbench Statistical Engine
//!
//! Latency aggregation for benchmark runs:
//! - Streaming updates (count, total, min, max) as samples arrive
//! - Retained sample vector for exact median computation
//! - Integer nanosecond arithmetic, truncating toward zero

mod summary;

pub use summary::{LatencyAggregator, LatencySummary};
