//! # Host: the process-facing wrapper around the scheduler.
//!
//! [`Host`] couples a [`Scheduler`] to a [`Lifecycle`] controller and exposes
//! the narrow contract the hosting process consumes:
//!
//! - **Attach/Detach** — clients signal their presence; the host stays up
//!   while anyone is attached. [`Host::bind`] returns an RAII guard.
//! - **Submission** — [`Host::submit`]/[`Host::submit_with`] accept a decoded
//!   `(queue, task)` pair. Decoding an external message into that pair is a
//!   collaborator concern.
//! - **Error surfacing mode** — [`SubmitOptions::ignore_error`] selects
//!   whether an unhandled task failure is escalated to a process-level fatal
//!   signal (default, for fire-and-forget submissions) or delivered only to
//!   the future and the lifecycle listeners.
//! - **Stop signal** — [`HostSignals::stop`] is canceled once, when the idle
//!   window elapses with no clients and no work.
//!
//! An internal listener feeds the lifecycle counters from the scheduler's
//! lifecycle events: `TaskScheduled` increments the in-flight count, each of
//! the three terminal kinds decrements it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::control::Lifecycle;
use crate::error::{ScheduleError, TaskError};
use crate::events::{Event, EventKind, Listen};
use crate::future::ObservableFuture;
use crate::lanes::Queue;
use crate::scheduler::Scheduler;
use crate::tasks::TaskRef;

/// Capability a task may opt into at submission time: a hook invoked with
/// the host before the task is scheduled. Replaces runtime type inspection
/// of the task object; the caller supplies the capability explicitly.
pub trait BindHost: Send + Sync + 'static {
    /// Called once, synchronously, before the task is handed to its lane.
    fn bind(&self, host: &Arc<Host>);
}

/// Per-submission options.
#[derive(Clone, Default)]
pub struct SubmitOptions {
    /// Suppress fatal escalation of an unhandled failure.
    ///
    /// By default a failing submission feeds the host's fatal channel, on
    /// the theory that silently losing a fire-and-forget failure is worse
    /// than failing loudly. Opting out is explicit, per submission.
    pub ignore_error: bool,

    /// Optional host capability handed to the submission (see [`BindHost`]).
    pub bind: Option<Arc<dyn BindHost>>,
}

impl SubmitOptions {
    /// Options that deliver failures only to the future and listeners.
    pub fn ignoring_errors() -> Self {
        Self {
            ignore_error: true,
            bind: None,
        }
    }

    /// Attaches a host capability.
    pub fn with_bind(mut self, bind: Arc<dyn BindHost>) -> Self {
        self.bind = Some(bind);
        self
    }
}

/// Outward signals of one host instance.
pub struct HostSignals {
    /// Canceled exactly once, when the host should terminate.
    pub stop: CancellationToken,
    /// Escalated failures from submissions without `ignore_error`.
    pub fatal: mpsc::UnboundedReceiver<TaskError>,
}

/// Scheduler plus lifecycle, bound together for one host process instance.
pub struct Host {
    scheduler: Scheduler,
    lifecycle: Lifecycle,
    fatal_tx: mpsc::UnboundedSender<TaskError>,
}

impl Host {
    /// Creates a host and the signal endpoints its process watches.
    pub fn new(config: Config) -> (Arc<Self>, HostSignals) {
        let scheduler = Scheduler::new(config.executor.clone());
        let lifecycle = Lifecycle::new(config.debounce, config.executor);
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

        scheduler.add_listener(Arc::new(IdleListener {
            lifecycle: lifecycle.clone(),
        }));

        let signals = HostSignals {
            stop: lifecycle.stop_signal(),
            fatal: fatal_rx,
        };
        let host = Arc::new(Self {
            scheduler,
            lifecycle,
            fatal_tx,
        });
        (host, signals)
    }

    /// Signals that a client connected.
    pub fn attach(&self) {
        tracing::debug!("client attached");
        self.lifecycle.attach();
    }

    /// Signals that a client disconnected.
    pub fn detach(&self) {
        tracing::debug!("client detached");
        self.lifecycle.detach();
    }

    /// Attaches and returns a guard that detaches on drop.
    pub fn bind(self: &Arc<Self>) -> Binding {
        self.attach();
        Binding {
            host: Arc::clone(self),
        }
    }

    /// Submits with default options (escalation on).
    pub fn submit<T: Send + Sync + 'static>(
        self: &Arc<Self>,
        queue: Queue,
        task: TaskRef<T>,
    ) -> Result<ObservableFuture<T>, ScheduleError> {
        self.submit_with(queue, task, SubmitOptions::default())
    }

    /// Submits a task with explicit options.
    ///
    /// Fails synchronously with [`ScheduleError::HostStopped`] once the
    /// lifecycle reached its terminal phase.
    pub fn submit_with<T: Send + Sync + 'static>(
        self: &Arc<Self>,
        queue: Queue,
        task: TaskRef<T>,
        options: SubmitOptions,
    ) -> Result<ObservableFuture<T>, ScheduleError> {
        if self.lifecycle.is_stopped() {
            return Err(ScheduleError::HostStopped);
        }
        if let Some(capability) = &options.bind {
            capability.bind(self);
        }

        let future = self.scheduler.schedule(queue, task)?;

        if !options.ignore_error {
            let fatal = self.fatal_tx.clone();
            future.subscribe(move |outcome| {
                if let Some(err) = outcome.failure() {
                    tracing::error!(error = %err, "unhandled task failure escalated");
                    let _ = fatal.send(err.clone());
                }
            });
        }
        Ok(future)
    }

    /// The scheduler façade (listener registration, direct scheduling).
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The lifecycle controller (phase and counter inspection).
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// RAII attachment guard; detaches when dropped.
pub struct Binding {
    host: Arc<Host>,
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.host.detach();
    }
}

/// Feeds lifecycle counters from scheduler events.
struct IdleListener {
    lifecycle: Lifecycle,
}

impl Listen for IdleListener {
    fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::TaskScheduled => self.lifecycle.task_scheduled(),
            EventKind::TaskFinished | EventKind::TaskCanceled | EventKind::TaskFailed => {
                self.lifecycle.task_terminal()
            }
            EventKind::TaskStarting => {}
        }
    }

    fn name(&self) -> &'static str {
        "idle-tracker"
    }
}
