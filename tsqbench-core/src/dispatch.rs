//! Dispatcher
//!
//! Consumes the query stream in order, routes each record to its worker
//! with host affinity, and owns the shutdown protocol: close every inbox
//! exactly once, await every worker, then close the sample channel so the
//! collector can finalize.
//!
//! Errors never short-circuit the drain. A mid-stream source error or a
//! failed query still runs the full shutdown sequence; the error surfaces
//! from [`Dispatcher::run`] only after the collector has finished.

use crate::collector::spawn_collector;
use crate::executor::{QueryError, QueryExecutor};
use crate::routing::{HostRouter, Route, WorkerId};
use crate::worker::{spawn_worker, WorkerHandle};
use crate::QueryParam;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use tsqbench_stats::LatencySummary;

/// Default capacity of each worker inbox.
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Default capacity of the sample channel feeding the collector.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 200;

/// Error produced by the query source, opaque to the pipeline.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal error of a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The source failed mid-stream; treated as early EOF, surfaced after
    /// the pipeline drained.
    #[error("query source failed: {0}")]
    Source(#[source] SourceError),
    /// A query failed. The run is aborted once the pipeline has drained.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// A pipeline task panicked.
    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Worker cap; `0` spawns one worker per distinct host.
    pub max_workers: usize,
    /// Bounded capacity of each worker inbox.
    pub inbox_capacity: usize,
    /// Bounded capacity of the sample channel.
    pub sample_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_workers: 0,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
        }
    }
}

/// Aggregate outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Latency statistics over all successful queries.
    pub latency: LatencySummary,
    /// Workers spawned over the lifetime of the run.
    pub workers_spawned: usize,
    /// Successful queries per worker, keyed by spawn index.
    pub worker_queries: BTreeMap<WorkerId, u64>,
}

/// Routes query parameters to a lazily grown worker pool and reports the
/// aggregated result.
pub struct Dispatcher<E> {
    config: DispatcherConfig,
    executor: Arc<E>,
}

impl<E: QueryExecutor> Dispatcher<E> {
    /// Create a dispatcher around a shared executor.
    pub fn new(executor: E, config: DispatcherConfig) -> Self {
        Self {
            config,
            executor: Arc::new(executor),
        }
    }

    /// Replay the whole source through the pipeline and return the summary.
    ///
    /// Returns once every worker and the collector have exited, whatever
    /// happened in between. Worker and source failures are reported only
    /// after that full drain.
    pub async fn run<I>(self, source: I) -> Result<RunSummary, BenchError>
    where
        I: IntoIterator<Item = Result<QueryParam, SourceError>>,
    {
        let (sample_tx, sample_rx) = mpsc::channel(self.config.sample_capacity);
        let collector = spawn_collector(sample_rx);

        let mut router = HostRouter::new(self.config.max_workers);
        let mut roster: Vec<WorkerHandle> = Vec::new();
        let mut source_error: Option<SourceError> = None;

        for record in source {
            let query = match record {
                Ok(query) => query,
                Err(err) => {
                    debug!(error = %err, "source failed mid-stream, draining pipeline");
                    source_error = Some(err);
                    break;
                }
            };

            let worker = match router.route(&query.host) {
                Route::Bound(id) => id,
                Route::Spawn(id) => {
                    debug!(worker = %id, host = %query.host, "spawning worker");
                    roster.push(spawn_worker(
                        id,
                        Arc::clone(&self.executor),
                        sample_tx.clone(),
                        self.config.inbox_capacity,
                    ));
                    id
                }
                Route::Overflow(id) => {
                    debug!(worker = %id, host = %query.host, "cap reached, binding by round-robin");
                    id
                }
            };

            trace!(worker = %worker, host = %query.host, "dispatching record");
            // A closed inbox here means the worker panicked; the join below
            // reports it, so the remaining records are simply dropped.
            let _ = roster[worker.0].inbox.send(query).await;
        }

        // Close every inbox before awaiting any worker; the pool drains in
        // parallel.
        let mut query_error: Option<QueryError> = None;
        let mut join_error: Option<tokio::task::JoinError> = None;

        let joins: Vec<_> = roster
            .into_iter()
            .map(|WorkerHandle { inbox, join }| {
                drop(inbox);
                join
            })
            .collect();

        for join in joins {
            match join.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    query_error.get_or_insert(err);
                }
                Err(err) => {
                    join_error.get_or_insert(err);
                }
            }
        }

        // Every worker has exited, so every cloned sender is gone; dropping
        // ours closes the sample channel and triggers finalization.
        drop(sample_tx);
        debug!(workers = router.workers_spawned(), "all workers done, closing sample channel");

        let stats = match collector.await {
            Ok(stats) => Some(stats),
            Err(err) => {
                join_error.get_or_insert(err);
                None
            }
        };

        if let Some(err) = source_error {
            return Err(BenchError::Source(err));
        }
        if let Some(err) = query_error {
            return Err(BenchError::Query(err));
        }
        if let Some(err) = join_error {
            return Err(BenchError::Task(err));
        }

        let stats = match stats {
            Some(stats) => stats,
            // No join error recorded means the collector completed.
            None => unreachable!("collector finished without error"),
        };
        Ok(RunSummary {
            latency: stats.latency,
            workers_spawned: router.workers_spawned(),
            worker_queries: stats.worker_queries,
        })
    }
}
