//! Sample Collector
//!
//! A single task drains the sample channel, keeping the latency aggregates
//! and the per-worker query tallies current. It finalizes when the channel
//! closes, which the dispatcher arranges only after every worker has
//! exited, so no sample can arrive late.

use crate::routing::WorkerId;
use crate::Sample;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tsqbench_stats::{LatencyAggregator, LatencySummary};

/// Finalized collector output, folded into the run summary.
#[derive(Debug)]
pub(crate) struct CollectedStats {
    pub(crate) latency: LatencySummary,
    pub(crate) worker_queries: BTreeMap<WorkerId, u64>,
}

/// Spawn the collector task on the given sample channel.
pub(crate) fn spawn_collector(samples: mpsc::Receiver<Sample>) -> JoinHandle<CollectedStats> {
    tokio::spawn(collect(samples))
}

async fn collect(mut samples: mpsc::Receiver<Sample>) -> CollectedStats {
    let mut aggregator = LatencyAggregator::new();
    let mut worker_queries: BTreeMap<WorkerId, u64> = BTreeMap::new();

    while let Some(sample) = samples.recv().await {
        aggregator.observe(sample.latency);
        *worker_queries.entry(sample.worker).or_default() += 1;
    }

    debug!(samples = aggregator.count(), "sample channel closed, finalizing");

    CollectedStats {
        latency: aggregator.finalize(),
        worker_queries,
    }
}
