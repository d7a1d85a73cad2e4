//! # Host configuration.
//!
//! [`Config`] centralizes the two knobs the host cares about: the idle
//! debounce window and the executor submissions run on. It is consumed once,
//! at [`Host::new`](crate::Host::new) / [`Scheduler::new`](crate::Scheduler::new)
//! time; there is no mutable global state to swap afterwards.

use std::time::Duration;

use crate::lanes::Executor;

/// Configuration for a host instance.
///
/// ## Field semantics
/// - `debounce`: delay between "idle detected" and "stop executed". Absorbs
///   rapid attach/detach churn and back-to-back batch submissions. `0` means
///   stop as soon as the idle check runs.
/// - `executor`: the resource lane workers, direct submissions, and the idle
///   stop timer are spawned on. Fixed at construction; in-flight work stays
///   bound to it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay between idle detection and the stop signal.
    pub debounce: Duration,

    /// Executor for lane workers, direct submissions, and the stop timer.
    ///
    /// [`Executor::Runtime`] (the default) uses the ambient tokio runtime.
    pub executor: Executor,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `debounce = 500ms` (absorbs reconnects without dragging shutdown out)
    /// - `executor = Executor::Runtime`
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            executor: Executor::Runtime,
        }
    }
}
