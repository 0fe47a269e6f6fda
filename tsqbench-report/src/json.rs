//! JSON Output

use crate::report::BenchReport;

/// Generate a prettified JSON report.
///
/// Serializes the benchmark report into machine-readable JSON format.
pub fn generate_json_report(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LatencyMetrics, ReportMeta, WorkerStat};

    #[test]
    fn json_report_round_trips() {
        let report = BenchReport {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: chrono::Utc::now(),
                source: "<stdin>".to_string(),
                worker_cap: 0,
            },
            latency: LatencyMetrics {
                queries: 1,
                total_ns: 2_000_000,
                min_ns: Some(2_000_000),
                max_ns: Some(2_000_000),
                median_ns: Some(2_000_000),
                average_ns: Some(2_000_000),
            },
            workers: vec![WorkerStat {
                worker: 0,
                queries: 1,
            }],
        };

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"total_ns\": 2000000"));

        let parsed: BenchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.latency.queries, 1);
        assert_eq!(parsed.workers.len(), 1);
    }
}
