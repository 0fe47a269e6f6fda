//! Latency Aggregation
//!
//! The aggregator is fed one latency per completed query and keeps both the
//! running aggregates and the full sample vector; the exact median needs
//! every sample, so nothing is forgotten until finalization.

use std::time::Duration;

/// Streaming latency accumulator.
///
/// `observe` keeps count, total, min, and max current; `finalize` sorts the
/// retained samples and produces the order statistics.
#[derive(Debug, Default)]
pub struct LatencyAggregator {
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Option<Duration>,
    samples: Vec<Duration>,
}

impl LatencyAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one query latency.
    pub fn observe(&mut self, latency: Duration) {
        self.count += 1;
        self.total += latency;
        self.samples.push(latency);

        if self.min.map_or(true, |m| latency < m) {
            self.min = Some(latency);
        }
        if self.max.map_or(true, |m| latency > m) {
            self.max = Some(latency);
        }
    }

    /// Number of samples observed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Consume the aggregator and compute the final summary.
    ///
    /// With zero samples the order statistics stay `None`; no value is ever
    /// invented for an empty run.
    pub fn finalize(mut self) -> LatencySummary {
        debug_assert_eq!(self.count as usize, self.samples.len());

        self.samples.sort_unstable();

        LatencySummary {
            count: self.count,
            total: self.total,
            min: self.min,
            max: self.max,
            median: median_of_sorted(&self.samples),
            average: average(self.total, self.count),
        }
    }
}

/// Finalized latency statistics for one benchmark run.
///
/// All order statistics are `None` iff `count == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencySummary {
    /// Number of successful queries.
    pub count: u64,
    /// Sum of all query latencies.
    pub total: Duration,
    /// Smallest latency seen.
    pub min: Option<Duration>,
    /// Largest latency seen.
    pub max: Option<Duration>,
    /// Median latency; even counts take the mean of the two middle samples,
    /// truncated toward zero at nanosecond resolution.
    pub median: Option<Duration>,
    /// Mean latency, `total / count` in integer nanoseconds.
    pub average: Option<Duration>,
}

/// Median of an ascending-sorted slice.
///
/// Even lengths average the two middle elements with integer nanosecond
/// division, matching `average` truncation.
fn median_of_sorted(sorted: &[Duration]) -> Option<Duration> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        let lo = sorted[n / 2 - 1].as_nanos();
        let hi = sorted[n / 2].as_nanos();
        Some(Duration::from_nanos(((lo + hi) / 2) as u64))
    } else {
        Some(sorted[n / 2])
    }
}

fn average(total: Duration, count: u64) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    Some(Duration::from_nanos(
        (total.as_nanos() / u128::from(count)) as u64,
    ))
}
