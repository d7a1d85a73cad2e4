//! # Task abstractions.
//!
//! - [`Task`] — trait for async, cancelable units of work with a typed result
//! - [`TaskFn`] — function-backed task implementation
//! - [`TaskRef`] — shared handle (`Arc<dyn Task<Output = T>>`)
//!
//! The scheduler holds a task only while it is queued or running; tasks are
//! not owned beyond the duration of their execution.

mod task;
mod task_fn;

pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
