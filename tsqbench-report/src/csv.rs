//! CSV Output
//!
//! One header line plus one data row per run. Optional statistics render as
//! empty fields rather than zeros so an empty run stays distinguishable.

use crate::report::BenchReport;

const HEADER: &str = "timestamp,source,worker_cap,workers_spawned,queries,\
total_ns,min_ns,max_ns,median_ns,average_ns";

/// Generate a spreadsheet-compatible CSV report.
pub fn generate_csv_report(report: &BenchReport) -> String {
    let latency = &report.latency;
    let row = [
        report.meta.timestamp.to_rfc3339(),
        escape_csv(&report.meta.source),
        report.meta.worker_cap.to_string(),
        report.workers.len().to_string(),
        latency.queries.to_string(),
        latency.total_ns.to_string(),
        opt_u64(latency.min_ns),
        opt_u64(latency.max_ns),
        opt_u64(latency.median_ns),
        opt_u64(latency.average_ns),
    ];

    format!("{}\n{}\n", HEADER, row.join(","))
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn opt_u64(v: Option<u64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LatencyMetrics, ReportMeta, WorkerStat};

    fn report(min: Option<u64>) -> BenchReport {
        BenchReport {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: chrono::Utc::now(),
                source: "data,with,commas.csv".to_string(),
                worker_cap: 3,
            },
            latency: LatencyMetrics {
                queries: 2,
                total_ns: 5_000,
                min_ns: min,
                max_ns: min.map(|m| m * 2),
                median_ns: min,
                average_ns: min,
            },
            workers: vec![WorkerStat {
                worker: 0,
                queries: 2,
            }],
        }
    }

    #[test]
    fn csv_report_has_header_and_one_row() {
        let csv = generate_csv_report(&report(Some(1_000)));
        let lines: Vec<&str> = csv.trim_end().lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("timestamp,source,worker_cap"));
        assert_eq!(lines[0].split(',').count(), lines[1].split(',').count() - 2);
        // Two extra splits come from the quoted source field's own commas.
        assert!(lines[1].contains("\"data,with,commas.csv\""));
    }

    #[test]
    fn undefined_statistics_render_as_empty_fields() {
        let csv = generate_csv_report(&report(None));
        assert!(csv.trim_end().ends_with(",,,,"));
    }
}
