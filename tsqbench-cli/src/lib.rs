#![warn(missing_docs)]
//! tsqbench CLI Library
//!
//! Wires the pipeline together: load configuration, open the CSV query
//! source, connect the database executor, run the dispatcher, and render
//! the report. `main` is a thin wrapper around [`run`].

mod config;
mod db;
mod source;

pub use config::{BenchConfig, DatabaseConfig, OutputConfig, RunnerConfig};
pub use db::{PostgresExecutor, BENCH_QUERY};
pub use source::QuerySource;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tsqbench_core::{Dispatcher, DispatcherConfig};
use tsqbench_report::{
    format_human_output, generate_csv_report, generate_json_report, BenchReport, OutputFormat,
    ReportMeta,
};

/// tsqbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tsqbench")]
#[command(author, version, about = "tsqbench - TimescaleDB query benchmark")]
pub struct Cli {
    /// CSV file of query parameters; '-' reads standard input
    #[arg(short, long, default_value = "-")]
    pub file: String,

    /// Worker cap; 0 spawns one worker per distinct host
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Database connection string; overrides tsqbench.toml and DATABASE_URL
    #[arg(long)]
    pub db_url: Option<String>,

    /// Database connect timeout in seconds
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the tsqbench CLI. This is the main entry point for the binary.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli).await
}

/// Run the tsqbench CLI with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging to stderr so reports stay pipeable.
    let filter = if cli.verbose {
        "tsqbench_core=debug,tsqbench_cli=debug"
    } else {
        "tsqbench_core=info,tsqbench_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Discover tsqbench.toml configuration (CLI flags override).
    let config = BenchConfig::discover().unwrap_or_default();

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let mut db_config = config.database.clone();
    if let Some(url) = &cli.db_url {
        db_config.url = Some(url.clone());
    } else if db_config.url.is_none() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            db_config.url = Some(url);
        }
    }
    if let Some(timeout) = cli.connect_timeout {
        db_config.connect_timeout_secs = timeout;
    }

    let max_workers = cli.workers.or(config.runner.workers).unwrap_or(0);
    let dispatcher_config = DispatcherConfig {
        max_workers,
        inbox_capacity: config.runner.inbox_capacity,
        sample_capacity: config.runner.sample_capacity,
    };

    let source = QuerySource::open(&cli.file)?;
    let source_label = source.label().to_string();

    info!(source = %source_label, workers = max_workers, "starting benchmark");
    let executor = PostgresExecutor::connect(&db_config).await?;

    let started = Instant::now();
    let progress = dispatch_spinner();
    let records = progress.wrap_iter(source.records());

    let dispatcher = Dispatcher::new(executor, dispatcher_config);
    let outcome = dispatcher.run(records).await;
    progress.finish_and_clear();

    let summary = outcome.context("benchmark run failed")?;
    info!(elapsed = ?started.elapsed(), queries = summary.latency.count, "benchmark complete");

    let report = BenchReport::new(
        ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            source: source_label,
            worker_cap: max_workers,
        },
        &summary,
    );

    let rendered = match format {
        OutputFormat::Human => format_human_output(&report),
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
    };

    if let Some(path) = &cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        file.write_all(rendered.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

/// Spinner over the dispatch loop; the record count is unknown upfront.
fn dispatch_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} queries dispatched")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_stdin_and_unbounded_workers() {
        let cli = Cli::parse_from(["tsqbench"]);
        assert_eq!(cli.file, "-");
        assert_eq!(cli.workers, None);
        assert_eq!(cli.format, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_accepts_short_and_long_flags() {
        let cli = Cli::parse_from(["tsqbench", "-f", "queries.csv", "-w", "4", "--format", "json"]);
        assert_eq!(cli.file, "queries.csv");
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.format.as_deref(), Some("json"));

        let cli = Cli::parse_from(["tsqbench", "--file", "-", "--workers", "0"]);
        assert_eq!(cli.file, "-");
        assert_eq!(cli.workers, Some(0));
    }
}
