//! Error types used by the scheduler and by tasks.
//!
//! Two error enums cover the two failure domains:
//!
//! - [`ScheduleError`] — invalid submissions, reported synchronously to the
//!   caller of `schedule`/`submit`, never deferred into a queue.
//! - [`TaskError`] — failures raised by individual task executions, captured
//!   and delivered through the [`ObservableFuture`](crate::ObservableFuture)
//!   and the `TaskFailed` lifecycle event.
//!
//! Cancellation is modeled as [`TaskError::Canceled`] so a task can report it
//! cooperatively, but the scheduler surfaces it as a distinct
//! [`Outcome::Canceled`](crate::Outcome::Canceled), never as a failure.
//!
//! Both types provide `as_label`/`as_message` helpers for logs and metrics.

use thiserror::Error;

/// # Errors raised while accepting a submission.
///
/// These are caller mistakes, surfaced before anything is enqueued.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A named queue was given an empty name.
    #[error("queue name must not be empty")]
    EmptyQueueName,

    /// The host has already transitioned to `Stopped` and accepts no work.
    #[error("host is stopped and no longer accepts submissions")]
    HostStopped,
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use queuevisor::ScheduleError;
    ///
    /// assert_eq!(ScheduleError::EmptyQueueName.as_label(), "empty_queue_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::EmptyQueueName => "empty_queue_name",
            ScheduleError::HostStopped => "host_stopped",
        }
    }
}

/// # Errors produced by task execution.
///
/// Captured on the executing lane and never propagated as a panic; delivered
/// via [`Outcome::Failure`](crate::Outcome::Failure) and a `TaskFailed` event.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed cancellation and exited cooperatively.
    #[error("task canceled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for a message-carrying failure.
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use queuevisor::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "canceled".to_string(),
        }
    }

    /// True when this error reports cooperative cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}
