//! Human Output Formatting
//!
//! Terminal-friendly rendering of the run report: the latency block in the
//! order total / count / min / max / median / average, followed by the
//! worker tallies.

use crate::report::BenchReport;

/// Format a nanosecond duration for terminal display.
///
/// Picks the largest unit that keeps the value above 1 and prints two
/// decimals, except plain nanoseconds which stay integral.
pub fn format_duration(nanos: u64) -> String {
    const MICRO: u64 = 1_000;
    const MILLI: u64 = 1_000_000;
    const SECOND: u64 = 1_000_000_000;
    const MINUTE: u64 = 60 * SECOND;

    if nanos < MICRO {
        format!("{}ns", nanos)
    } else if nanos < MILLI {
        format!("{:.2}µs", nanos as f64 / MICRO as f64)
    } else if nanos < SECOND {
        format!("{:.2}ms", nanos as f64 / MILLI as f64)
    } else if nanos < MINUTE {
        format!("{:.2}s", nanos as f64 / SECOND as f64)
    } else {
        let minutes = nanos / MINUTE;
        let seconds = (nanos % MINUTE) as f64 / SECOND as f64;
        format!("{}m{:.2}s", minutes, seconds)
    }
}

fn format_optional(nanos: Option<u64>) -> String {
    match nanos {
        Some(nanos) => format_duration(nanos),
        None => "n/a".to_string(),
    }
}

/// Format a report for human-readable terminal display.
pub fn format_human_output(report: &BenchReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Query Benchmark Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    output.push_str(&format!("Source: {}\n\n", report.meta.source));

    let latency = &report.latency;
    output.push_str(&format!(
        "Total processing time: {}\n",
        format_duration(latency.total_ns)
    ));
    output.push_str(&format!("Queries executed:      {}\n", latency.queries));
    output.push_str(&format!(
        "Min query time:        {}\n",
        format_optional(latency.min_ns)
    ));
    output.push_str(&format!(
        "Max query time:        {}\n",
        format_optional(latency.max_ns)
    ));
    output.push_str(&format!(
        "Median query time:     {}\n",
        format_optional(latency.median_ns)
    ));
    output.push_str(&format!(
        "Average query time:    {}\n",
        format_optional(latency.average_ns)
    ));

    if latency.queries == 0 {
        output.push_str("\nNo queries completed; latency statistics are undefined.\n");
    }

    output.push_str("\nWorker Stats\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!("Workers spawned: {}\n", report.workers.len()));
    for stat in &report.workers {
        output.push_str(&format!(
            "  Worker {}: {} queries\n",
            stat.worker, stat.queries
        ));
    }

    output
}
