//! Task lifecycle events: types and listener fan-out.
//!
//! This module groups the event **data model** and the **multicaster** used
//! to push lifecycle events from the scheduler to registered listeners.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Listen`], [`ListenerSet`] — synchronous fan-out in registration order
//!
//! ## Quick reference
//! - **Publisher**: the [`Scheduler`](crate::Scheduler) façade — one
//!   `TaskScheduled`, one `TaskStarting` (unless the task never starts), and
//!   exactly one terminal event per submission.
//! - **Consumers**: user listeners (instrumentation) and the host's internal
//!   idle listener that feeds the lifecycle counters.

mod event;
mod listeners;
mod log;

pub use event::{Event, EventKind};
pub(crate) use listeners::panic_message;
pub use listeners::{Listen, ListenerSet};
pub use log::LogListener;
