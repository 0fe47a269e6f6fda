//! Postgres Query Executor
//!
//! The production executor: one shared client, one prepared statement,
//! driven by every worker concurrently through the connection's internal
//! pipelining.

use crate::config::DatabaseConfig;
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tokio_postgres::types::Type;
use tokio_postgres::NoTls;
use tracing::{debug, error};
use tsqbench_core::{QueryError, QueryExecutor, QueryParam};

/// The benchmarked query: per-minute max/min CPU usage for one host over a
/// time range. Timestamps arrive as text and are cast by the database.
pub const BENCH_QUERY: &str = "\
SELECT time_bucket('1 minute', ts) AS bucket, MAX(usage), MIN(usage)
  FROM cpu_usage
 WHERE host = $1 AND ts > $2::timestamptz AND ts < $3::timestamptz
 GROUP BY bucket ORDER BY bucket";

/// Executes benchmark queries against a TimescaleDB instance.
pub struct PostgresExecutor {
    client: tokio_postgres::Client,
    statement: tokio_postgres::Statement,
}

impl PostgresExecutor {
    /// Connect and prepare the benchmark statement.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let conn_str = config.connection_string();
        let timeout = Duration::from_secs(config.connect_timeout_secs.max(1));

        let (client, connection) =
            tokio::time::timeout(timeout, tokio_postgres::connect(&conn_str, NoTls))
                .await
                .context("timed out connecting to database")?
                .context("failed to connect to database")?;

        // The connection object performs the actual database I/O; it runs
        // on its own task for the lifetime of the client.
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "database connection error");
            }
        });

        let statement = client
            .prepare_typed(BENCH_QUERY, &[Type::TEXT, Type::TEXT, Type::TEXT])
            .await
            .context("failed to prepare benchmark query")?;
        debug!("database connection established, statement prepared");

        Ok(Self { client, statement })
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, query: &QueryParam) -> Result<(), QueryError> {
        self.client
            .query(&self.statement, &[&query.host, &query.start, &query.end])
            .await
            .map(|_rows| ())
            .map_err(|err| QueryError::new(query.host.clone(), err))
    }
}
