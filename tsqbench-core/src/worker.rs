//! Worker Loop
//!
//! One task per worker. A worker pulls records off its inbox serially,
//! times each executor call with a monotonic clock, and forwards one sample
//! per successful query. When its inbox closes and drains, the task
//! returns, which is the worker's done signal.

use crate::executor::{QueryError, QueryExecutor};
use crate::routing::WorkerId;
use crate::{QueryParam, Sample};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Dispatcher-side handle for one worker.
///
/// Dropping `inbox` closes the worker's queue; awaiting `join` is the done
/// signal, firing once the inbox has been drained and the task has exited.
pub(crate) struct WorkerHandle {
    pub(crate) inbox: mpsc::Sender<QueryParam>,
    pub(crate) join: JoinHandle<Result<(), QueryError>>,
}

/// Spawn a worker task with a bounded inbox.
pub(crate) fn spawn_worker<E: QueryExecutor>(
    id: WorkerId,
    executor: Arc<E>,
    samples: mpsc::Sender<Sample>,
    inbox_capacity: usize,
) -> WorkerHandle {
    let (tx, rx) = mpsc::channel(inbox_capacity);
    let join = tokio::spawn(worker_loop(id, rx, executor, samples));
    WorkerHandle { inbox: tx, join }
}

/// Execute queries until the inbox closes.
///
/// A query failure is fatal to the run, but the loop keeps receiving and
/// discarding records afterwards: stopping early would leave the dispatcher
/// blocked on a full inbox nobody drains. The first failure is returned
/// once the inbox is exhausted.
async fn worker_loop<E: QueryExecutor>(
    id: WorkerId,
    mut inbox: mpsc::Receiver<QueryParam>,
    executor: Arc<E>,
    samples: mpsc::Sender<Sample>,
) -> Result<(), QueryError> {
    let mut failure: Option<QueryError> = None;

    while let Some(query) = inbox.recv().await {
        if failure.is_some() {
            continue;
        }

        // The measured interval covers the executor call alone, not the
        // channel traffic around it.
        let started = Instant::now();
        match executor.execute(&query).await {
            Ok(()) => {
                let latency = started.elapsed();
                let _ = samples.send(Sample { worker: id, latency }).await;
            }
            Err(err) => {
                warn!(worker = %id, host = %query.host, error = %err, "query failed, draining inbox");
                failure = Some(err);
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
