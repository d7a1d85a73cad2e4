//! # Lifecycle events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies the task lifecycle: one `TaskScheduled`
//! per accepted submission, at most one `TaskStarting`, and exactly one of
//! the three terminal kinds (`TaskFinished` / `TaskCanceled` / `TaskFailed`).
//!
//! The [`Event`] struct carries metadata: timestamp, task name, queue name,
//! and a failure reason where applicable.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Delivery order is only guaranteed within a single task's
//! lifecycle; use `seq` to order events of unrelated tasks.
//!
//! ## Example
//! ```rust
//! use queuevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("sync-account")
//!     .with_queue("account")
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("sync-account"));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of task lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Submission accepted; emitted synchronously **before** the task is
    /// handed to its lane, so listeners can react before any work starts.
    ///
    /// Sets: `task`, `queue` (absent for direct submissions), `at`, `seq`.
    TaskScheduled,

    /// The lane is about to run the task.
    ///
    /// Sets: `task`, `queue`, `at`, `seq`.
    TaskStarting,

    /// Task completed successfully. Terminal; mutually exclusive with
    /// `TaskCanceled` and `TaskFailed` for the same submission.
    ///
    /// Sets: `task`, `queue`, `at`, `seq`.
    TaskFinished,

    /// Task was canceled, either before it started (removed from the lane)
    /// or cooperatively while running. Terminal.
    ///
    /// Sets: `task`, `queue`, `at`, `seq`.
    TaskCanceled,

    /// Task failed. Terminal.
    ///
    /// Sets: `task`, `queue`, `reason` (failure message), `at`, `seq`.
    TaskFailed,
}

impl EventKind {
    /// True for the three mutually exclusive terminal kinds.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EventKind::TaskFinished | EventKind::TaskCanceled | EventKind::TaskFailed
        )
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Name of the queue the task was submitted to; `None` for direct
    /// (unordered) submissions.
    pub queue: Option<Arc<str>>,
    /// Human-readable reason (failure message).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            queue: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a queue name.
    #[inline]
    pub fn with_queue(mut self, queue: impl Into<Arc<str>>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Attaches a queue name if one is present.
    #[inline]
    pub fn with_queue_opt(mut self, queue: Option<Arc<str>>) -> Self {
        self.queue = queue;
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::TaskScheduled);
        let b = Event::new(EventKind::TaskStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn terminal_kinds() {
        assert!(!EventKind::TaskScheduled.is_terminal());
        assert!(!EventKind::TaskStarting.is_terminal());
        assert!(EventKind::TaskFinished.is_terminal());
        assert!(EventKind::TaskCanceled.is_terminal());
        assert!(EventKind::TaskFailed.is_terminal());
    }
}
