//! # Serial lane: one queue name, one worker, FIFO order.
//!
//! A [`Lane`] owns the sender side of an unbounded job channel. A single
//! worker, spawned on the scheduler's [`Executor`], drains the channel and
//! awaits each job to completion before taking the next one. That worker is
//! the entire ordering mechanism: same lane → submission order, one at a
//! time; different lanes → free to interleave.
//!
//! A job that never completes stalls its own lane only; other lanes keep
//! draining.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use super::Executor;

/// A job is an already-wrapped unit of work: it runs the task, resolves the
/// submission's future, and emits the terminal event.
pub(crate) type Job = BoxFuture<'static, ()>;

/// Handle to one serial lane.
pub(crate) struct Lane {
    tx: mpsc::UnboundedSender<Job>,
}

impl Lane {
    /// Creates the lane and spawns its worker on `executor`.
    pub(crate) fn spawn(name: &str, executor: &Executor) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let lane_name = name.to_string();

        executor.spawn(Box::pin(async move {
            tracing::debug!(lane = %lane_name, "lane worker started");
            while let Some(job) = rx.recv().await {
                job.await;
            }
            tracing::debug!(lane = %lane_name, "lane worker stopped");
        }));

        Self { tx }
    }

    /// Appends a job to this lane. Never blocks.
    ///
    /// Sending can only fail once the worker is gone, which happens when the
    /// backing runtime is shutting down; the job is dropped in that case.
    pub(crate) fn enqueue(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::warn!("lane worker gone; dropping job (runtime shutdown)");
        }
    }
}
