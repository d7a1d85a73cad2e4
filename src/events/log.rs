//! # Simple logging listener for debugging and demos.
//!
//! [`LogListener`] reports every lifecycle event through `tracing`. Useful
//! during development; production setups usually implement a custom
//! [`Listen`] for structured metrics instead.

use super::{Event, EventKind, Listen};

/// Tracing-backed logging listener.
///
/// Emits one `tracing` record per lifecycle event:
///
/// ```text
/// scheduled task=sync-account queue=account
/// starting  task=sync-account queue=account
/// failed    task=sync-account queue=account reason="connection refused"
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl Listen for LogListener {
    fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("?");
        let queue = e.queue.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::TaskScheduled => {
                tracing::debug!(task, queue, seq = e.seq, "scheduled");
            }
            EventKind::TaskStarting => {
                tracing::debug!(task, queue, seq = e.seq, "starting");
            }
            EventKind::TaskFinished => {
                tracing::debug!(task, queue, seq = e.seq, "finished");
            }
            EventKind::TaskCanceled => {
                tracing::debug!(task, queue, seq = e.seq, "canceled");
            }
            EventKind::TaskFailed => {
                let reason = e.reason.as_deref().unwrap_or("?");
                tracing::warn!(task, queue, seq = e.seq, reason, "failed");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
