//! # Task trait: async, cancelable, typed result.
//!
//! A task receives a [`CancellationToken`] and should periodically check it
//! to stop cooperatively when the submission is canceled. A task that
//! observes cancellation should return [`TaskError::Canceled`]; a task that
//! ignores the token may still complete normally, in which case whichever
//! terminal transition happens first wins.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to a task producing `T`.
pub type TaskRef<T> = Arc<dyn Task<Output = T>>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Task` has a stable [`name`](Task::name) and an async
/// [`run`](Task::run) method that receives a [`CancellationToken`] scoped to
/// its submission.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use queuevisor::{Task, TaskError};
///
/// struct FetchBalance;
///
/// #[async_trait]
/// impl Task for FetchBalance {
///     type Output = u64;
///
///     fn name(&self) -> &str { "fetch-balance" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<u64, TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         Ok(42)
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Result type delivered through the submission's observable future.
    ///
    /// Shared with every subscriber behind an `Arc`, hence `Sync`.
    type Output: Send + Sync + 'static;

    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion or cancellation.
    ///
    /// Implementations should check `ctx.is_cancelled()` (or select on
    /// `ctx.cancelled()`) and return [`TaskError::Canceled`] promptly when a
    /// cancel request arrives.
    async fn run(&self, ctx: CancellationToken) -> Result<Self::Output, TaskError>;
}
