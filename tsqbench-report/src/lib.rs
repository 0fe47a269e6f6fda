#![warn(missing_docs)]
//! tsqbench Report - Benchmark Output
//!
//! Generates the run report in several formats:
//! - Human-readable terminal block (default)
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible, one row per run)

mod csv;
mod human;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use human::{format_duration, format_human_output};
pub use json::generate_json_report;
pub use report::{BenchReport, LatencyMetrics, ReportMeta, WorkerStat};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with the full report structure
    Json,
    /// One-row CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_known_names() {
        assert_eq!("human".parse(), Ok(OutputFormat::Human));
        assert_eq!("JSON".parse(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse(), Ok(OutputFormat::Csv));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
