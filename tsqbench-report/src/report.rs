//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tsqbench_core::{RunSummary, WorkerId};
use tsqbench_stats::LatencySummary;

/// Complete benchmark report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Report metadata and run configuration
    pub meta: ReportMeta,
    /// Aggregate latency metrics
    pub latency: LatencyMetrics,
    /// Per-worker query tallies, in spawn order
    pub workers: Vec<WorkerStat>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Tool version string
    pub version: String,
    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
    /// Where the query parameters came from (path or `<stdin>`)
    pub source: String,
    /// Configured worker cap; 0 means one worker per distinct host
    pub worker_cap: usize,
}

/// Latency metrics in integer nanoseconds.
///
/// The optional fields are `None` for an empty run; zero is never invented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// Number of queries that completed successfully
    pub queries: u64,
    /// Total processing time: the sum of all query latencies
    pub total_ns: u64,
    /// Fastest query
    pub min_ns: Option<u64>,
    /// Slowest query
    pub max_ns: Option<u64>,
    /// Median query time
    pub median_ns: Option<u64>,
    /// Mean query time
    pub average_ns: Option<u64>,
}

impl From<&LatencySummary> for LatencyMetrics {
    fn from(summary: &LatencySummary) -> Self {
        let ns = |d: std::time::Duration| d.as_nanos() as u64;
        Self {
            queries: summary.count,
            total_ns: ns(summary.total),
            min_ns: summary.min.map(ns),
            max_ns: summary.max.map(ns),
            median_ns: summary.median.map(ns),
            average_ns: summary.average.map(ns),
        }
    }
}

/// Query count for one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStat {
    /// Worker index in spawn order
    pub worker: usize,
    /// Successful queries this worker ran
    pub queries: u64,
}

impl BenchReport {
    /// Assemble the report from a finished run.
    ///
    /// Workers that ran no successful query still get a row, so the worker
    /// list always covers `0..workers_spawned`.
    pub fn new(meta: ReportMeta, summary: &RunSummary) -> Self {
        let workers = (0..summary.workers_spawned)
            .map(|index| WorkerStat {
                worker: index,
                queries: summary
                    .worker_queries
                    .get(&WorkerId(index))
                    .copied()
                    .unwrap_or(0),
            })
            .collect();

        Self {
            meta,
            latency: LatencyMetrics::from(&summary.latency),
            workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn report_lists_every_spawned_worker() {
        let mut worker_queries = BTreeMap::new();
        worker_queries.insert(WorkerId(0), 4);
        // Worker 1 spawned but produced no samples.

        let summary = RunSummary {
            latency: LatencySummary {
                count: 4,
                total: Duration::from_millis(8),
                min: Some(Duration::from_millis(1)),
                max: Some(Duration::from_millis(3)),
                median: Some(Duration::from_millis(2)),
                average: Some(Duration::from_millis(2)),
            },
            workers_spawned: 2,
            worker_queries,
        };

        let meta = ReportMeta {
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            source: "queries.csv".to_string(),
            worker_cap: 2,
        };
        let report = BenchReport::new(meta, &summary);

        assert_eq!(report.workers.len(), 2);
        assert_eq!(report.workers[0].queries, 4);
        assert_eq!(report.workers[1].queries, 0);
        assert_eq!(report.latency.queries, 4);
        assert_eq!(report.latency.total_ns, 8_000_000);
        assert_eq!(report.latency.median_ns, Some(2_000_000));
    }

    #[test]
    fn empty_run_keeps_statistics_undefined() {
        let summary = RunSummary {
            latency: LatencySummary {
                count: 0,
                total: Duration::ZERO,
                min: None,
                max: None,
                median: None,
                average: None,
            },
            workers_spawned: 0,
            worker_queries: BTreeMap::new(),
        };

        let meta = ReportMeta {
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            source: "<stdin>".to_string(),
            worker_cap: 0,
        };
        let report = BenchReport::new(meta, &summary);

        assert!(report.workers.is_empty());
        assert_eq!(report.latency.queries, 0);
        assert!(report.latency.min_ns.is_none());
        assert!(report.latency.average_ns.is_none());
    }
}
