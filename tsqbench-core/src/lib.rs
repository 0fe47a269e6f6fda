#![warn(missing_docs)]
//! tsqbench Core - Benchmark Pipeline
//!
//! This crate provides the concurrent heart of the benchmark:
//! - `Dispatcher` routes query parameters to workers with host affinity
//! - Workers execute queries serially and time each one
//! - The collector folds worker samples into the run summary
//!
//! ## Pipeline Overview
//!
//! ```text
//! QueryParam stream (CSV, tests, ...)
//!       │
//!       ▼
//! ┌────────────┐   bounded inboxes    ┌──────────┐
//! │ Dispatcher │ ───────────────────▶ │ Worker N │  execute + time
//! └────────────┘   (host affinity)    └────┬─────┘
//!                                          │ samples (bounded)
//!                                          ▼
//!                                    ┌───────────┐
//!                                    │ Collector │  running aggregates
//!                                    └───────────┘
//! ```
//!
//! Shutdown is input-driven: once the source is exhausted the dispatcher
//! closes every inbox, awaits every worker, then closes the sample channel
//! so the collector can finalize. No task outlives [`Dispatcher::run`].

mod collector;
mod dispatch;
mod executor;
mod routing;
mod worker;

pub use dispatch::{
    BenchError, Dispatcher, DispatcherConfig, RunSummary, SourceError, DEFAULT_INBOX_CAPACITY,
    DEFAULT_SAMPLE_CAPACITY,
};
pub use executor::{QueryError, QueryExecutor};
pub use routing::{HostRouter, Route, WorkerId};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of a single range query, one row of the input CSV.
///
/// Timestamps pass through as opaque strings; the benchmark never parses
/// them, the database does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Host whose series the query scans. Routing key for worker affinity.
    #[serde(rename = "hostname")]
    pub host: String,
    /// Inclusive lower bound of the scanned range.
    #[serde(rename = "start_time")]
    pub start: String,
    /// Exclusive upper bound of the scanned range.
    #[serde(rename = "end_time")]
    pub end: String,
}

/// One measured query, emitted by a worker after a successful execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Worker that ran the query.
    pub worker: WorkerId,
    /// Wall-clock time of the executor call alone.
    pub latency: Duration,
}
