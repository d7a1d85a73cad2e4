//! # queuevisor
//!
//! **queuevisor** is a host-process task scheduler: independently ordered,
//! named work queues feeding a pool of executors, coupled to a lifecycle
//! controller that stops the hosting process automatically once no work is
//! pending and no client is attached.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     caller                         caller                      host process
//!        │ schedule("files", task)      │ attach()/detach()           │ awaits stop
//!        ▼                              ▼                             ▼
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │  Host                                                                     │
//! │  ├─ Scheduler (façade)                                                    │
//! │  │    ├─ LaneRegistry (queue name → serial lane, created lazily)          │
//! │  │    └─ ListenerSet  (sync fan-out of lifecycle events)                  │
//! │  └─ Lifecycle (bound clients + active tasks → debounced stop)             │
//! └──────┬──────────────────────┬──────────────────────┬──────────────────────┘
//!        ▼                      ▼                      ▼
//!   ┌──────────┐          ┌──────────┐           ┌──────────┐
//!   │ lane "a" │          │ lane "b" │           │  direct  │
//!   │ (FIFO)   │          │ (FIFO)   │           │(unordered)│
//!   └────┬─────┘          └────┬─────┘           └────┬─────┘
//!        │ run task            │                      │
//!        ▼                     ▼                      ▼
//!   ObservableFuture      ObservableFuture       ObservableFuture
//!   (multi-subscriber, exactly one terminal notification each)
//! ```
//!
//! ### Lifecycle of a submission
//! ```text
//! schedule(queue, task)
//!   ├─► emit TaskScheduled (sync, before any work)
//!   ├─► lane worker dequeues in FIFO order
//!   │     ├─ canceled while queued ─► Outcome::Canceled, emit TaskCanceled
//!   │     └─ else: emit TaskStarting, run task
//!   │            ├─ Ok(v)            ─► Outcome::Success,  emit TaskFinished
//!   │            ├─ Err(Canceled)    ─► Outcome::Canceled, emit TaskCanceled
//!   │            └─ Err(e) / panic   ─► Outcome::Failure,  emit TaskFailed
//!   └─► subscribers of the ObservableFuture notified exactly once each
//!
//! Independently:
//!   TaskScheduled / terminal events ─► Lifecycle counters ─► idle?
//!   idle ─► debounce window ─► still idle? ─► stop signal to the host
//! ```
//!
//! ## Features
//! | Area          | Description                                              | Key types / traits                  |
//! |---------------|----------------------------------------------------------|-------------------------------------|
//! | **Scheduling**| FIFO-per-queue dispatch onto concurrent lanes.           | [`Scheduler`], [`Queue`]            |
//! | **Futures**   | Multi-subscriber outcome with one notification each.     | [`ObservableFuture`], [`Outcome`]   |
//! | **Events**    | Lifecycle fan-out for instrumentation and idle tracking. | [`Listen`], [`ListenerSet`], [`Event`] |
//! | **Lifecycle** | Debounced idle shutdown of the host process.             | [`Host`], [`Lifecycle`], [`Phase`]  |
//! | **Tasks**     | Async, cancelable units with typed results.              | [`Task`], [`TaskFn`], [`TaskRef`]   |
//! | **Observation**| Generic single-terminal-delivery multicast.             | [`Multicast`], [`Observe`]          |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use queuevisor::{Config, Host, Queue, TaskError, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (host, _signals) = Host::new(Config::default());
//!     let _binding = host.bind();
//!
//!     let task: TaskRef<String> = TaskFn::arc("greet", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(TaskError::Canceled);
//!         }
//!         Ok("hello".to_string())
//!     });
//!
//!     let future = host.submit(Queue::named("greetings"), task)?;
//!     let outcome = future.outcome().await;
//!     assert_eq!(outcome.value().map(String::as_str), Some("hello"));
//!     Ok(())
//! }
//! ```

mod config;
mod control;
mod error;
mod events;
mod future;
mod host;
mod lanes;
mod observe;
mod scheduler;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use control::{Lifecycle, Phase};
pub use error::{ScheduleError, TaskError};
pub use events::{Event, EventKind, Listen, ListenerSet, LogListener};
pub use future::{ObservableFuture, Outcome};
pub use host::{BindHost, Binding, Host, HostSignals, SubmitOptions};
pub use lanes::{Executor, LaneRegistry, Queue, DEFAULT_QUEUE};
pub use observe::{Multicast, Observe};
pub use scheduler::Scheduler;
pub use tasks::{Task, TaskFn, TaskRef};
