//! # Execution lanes backing named queues.
//!
//! A *lane* is the ordered execution context behind one queue name: an
//! unbounded job channel drained by a single worker, so jobs submitted to the
//! same name run in submission order, one at a time. Jobs on different lanes
//! run concurrently on the configured [`Executor`].
//!
//! ## Contents
//! - [`Queue`] — queue identifier (default / named / direct sentinel)
//! - [`Executor`] — where lane workers and direct jobs are spawned
//! - [`LaneRegistry`] — lazily creates and caches lanes by name
//!
//! Lanes are never destroyed during the registry's lifetime; the registry
//! grows monotonically, bounded by the number of distinct queue names the
//! application uses.

mod executor;
mod lane;
mod registry;

pub use executor::Executor;
pub use registry::LaneRegistry;

use std::sync::Arc;

/// Name of the queue used when the caller does not pick one.
pub const DEFAULT_QUEUE: &str = "default";

/// Identifies the lane a submission is ordered on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Queue {
    /// The shared default queue ([`DEFAULT_QUEUE`]).
    #[default]
    Default,
    /// A named queue; tasks on the same name run FIFO, one at a time.
    Named(Arc<str>),
    /// No queue: run as soon as the executor has capacity, unordered.
    /// Explicitly bypasses the FIFO-per-queue guarantee.
    Direct,
}

impl Queue {
    /// Convenience constructor for a named queue.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Queue::Named(name.into())
    }

    /// The lane name, or `None` for direct submissions.
    pub fn name(&self) -> Option<Arc<str>> {
        match self {
            Queue::Default => Some(Arc::from(DEFAULT_QUEUE)),
            Queue::Named(name) => Some(Arc::clone(name)),
            Queue::Direct => None,
        }
    }
}

impl From<&str> for Queue {
    fn from(name: &str) -> Self {
        Queue::Named(Arc::from(name))
    }
}
