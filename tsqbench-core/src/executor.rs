//! Query Executor Seam
//!
//! The pipeline is generic over how a query actually runs; the production
//! implementation wraps a database client, tests substitute deterministic
//! fakes. Workers time the `execute` call and nothing else.

use crate::QueryParam;
use async_trait::async_trait;

/// A query failed. Fatal to the run: the owning worker stops executing and
/// the error surfaces from [`Dispatcher::run`](crate::Dispatcher::run) once
/// the pipeline has drained.
#[derive(Debug, thiserror::Error)]
#[error("query against host {host} failed: {source}")]
pub struct QueryError {
    /// Host the failed query targeted.
    pub host: String,
    /// Underlying driver error.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl QueryError {
    /// Wrap a driver error for the given host.
    pub fn new(
        host: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            host: host.into(),
            source: source.into(),
        }
    }
}

/// Executes one query. Shared by every worker, so implementations must be
/// safe under the configured concurrency level.
///
/// Result rows are the database's business; the benchmark only cares
/// whether the query succeeded and how long `execute` took.
#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// Run a single query to completion.
    async fn execute(&self, query: &QueryParam) -> Result<(), QueryError>;
}
