//! # Executor configuration.
//!
//! The executor is the resource that actually runs lane workers and direct
//! jobs. It is an explicit configuration value fixed at scheduler
//! construction; everything scheduled through one scheduler stays bound to
//! the executor it was constructed with.

use futures::future::BoxFuture;

/// Where lane workers and direct submissions are spawned.
///
/// [`Executor::Runtime`] is the "default lane pool" fallback: jobs land on
/// the ambient tokio runtime via `tokio::spawn`. Supplying a
/// [`tokio::runtime::Handle`] pins all work of one scheduler to that runtime
/// instead.
#[derive(Debug, Clone, Default)]
pub enum Executor {
    /// Spawn on the ambient tokio runtime.
    #[default]
    Runtime,
    /// Spawn on an explicitly supplied runtime handle.
    Handle(tokio::runtime::Handle),
}

impl Executor {
    /// Spawns a job on this executor. Fire-and-forget; the job itself is
    /// responsible for reporting its outcome.
    ///
    /// Never panics. [`Executor::Runtime`] with no ambient runtime has
    /// nowhere to run the job; it is dropped with a warning. An explicit
    /// [`Executor::Handle`] spawns from any thread.
    pub fn spawn(&self, job: BoxFuture<'static, ()>) {
        match self {
            Executor::Runtime => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(job);
                }
                Err(_) => {
                    tracing::warn!("no ambient tokio runtime; dropping job");
                }
            },
            Executor::Handle(handle) => {
                handle.spawn(job);
            }
        }
    }
}
