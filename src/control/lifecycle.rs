//! # Debounced idle-shutdown state machine.
//!
//! [`Lifecycle`] tracks two counters — attached clients and in-flight tasks —
//! and derives `idle = (bound_clients == 0) && (active_tasks == 0)`.
//!
//! ## State machine
//! ```text
//! ACTIVE ──(idle becomes true)──► STOP_PENDING ──(window elapses, still idle)──► STOPPED
//!    ▲                                 │
//!    └──(idle becomes false)───────────┘   (timer disarmed, no stop)
//! ```
//!
//! - Arming replaces any prior pending timer (epoch bump), so at most one
//!   timer is live at a time and rapid attach/detach or schedule/finish churn
//!   collapses into a single window.
//! - The timer re-checks `idle` under the lock at expiry; it never assumes
//!   the predicate held for the whole window.
//! - The timer holds only a `Weak` reference to the controller: a host torn
//!   down by other means is a no-op target, never resurrected by a stale
//!   timer firing.
//! - `STOPPED` is terminal for this instance. The stop signal is a
//!   [`CancellationToken`] the host awaits.
//!
//! All counter mutations and phase transitions are linearized under a single
//! mutex, so the idle predicate is always evaluated against a consistent
//! snapshot.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::lanes::Executor;

/// Lifecycle phase of the host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clients attached and/or tasks in flight (or not yet idle long enough).
    Active,
    /// Idle detected; stop timer armed.
    StopPending,
    /// Stop executed. Terminal for this instance.
    Stopped,
}

struct ControlState {
    bound_clients: u64,
    active_tasks: u64,
    phase: Phase,
    /// Bumped on every arm/disarm; a timer only acts if its epoch is still
    /// current, which caps live timers at one.
    epoch: u64,
}

struct LifecycleInner {
    state: Mutex<ControlState>,
    debounce: Duration,
    /// Runs the debounce timers. The same executor the host's lanes use, so
    /// `attach`/`detach` work from any thread, runtime or not.
    executor: Executor,
    stop: CancellationToken,
}

/// Debounced idle controller for one host instance.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<LifecycleInner>,
}

impl Lifecycle {
    /// Creates a controller in `Active` phase with the given debounce window.
    /// Stop timers are spawned on `executor`.
    pub fn new(debounce: Duration, executor: Executor) -> Self {
        Self {
            inner: Arc::new(LifecycleInner {
                state: Mutex::new(ControlState {
                    bound_clients: 0,
                    active_tasks: 0,
                    phase: Phase::Active,
                    epoch: 0,
                }),
                debounce,
                executor,
                stop: CancellationToken::new(),
            }),
        }
    }

    /// Token canceled exactly once, when the controller reaches `Stopped`.
    pub fn stop_signal(&self) -> CancellationToken {
        self.inner.stop.clone()
    }

    /// A client attached to the host.
    pub fn attach(&self) {
        self.update(|s| s.bound_clients += 1);
    }

    /// A client detached from the host.
    pub fn detach(&self) {
        self.update(|s| {
            debug_assert!(s.bound_clients > 0, "detach without matching attach");
            s.bound_clients = s.bound_clients.saturating_sub(1);
        });
    }

    /// A task was scheduled (counted until its terminal event).
    pub fn task_scheduled(&self) {
        self.update(|s| s.active_tasks += 1);
    }

    /// A task reached a terminal state (finished, canceled, or failed).
    pub fn task_terminal(&self) {
        self.update(|s| {
            debug_assert!(s.active_tasks > 0, "terminal event without schedule");
            s.active_tasks = s.active_tasks.saturating_sub(1);
        });
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// True once the stop has been executed.
    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    /// Currently attached clients.
    pub fn bound_clients(&self) -> u64 {
        self.lock().bound_clients
    }

    /// Scheduled-but-not-yet-terminal tasks.
    pub fn active_tasks(&self) -> u64 {
        self.lock().active_tasks
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControlState> {
        self.inner.state.lock().expect("lifecycle state poisoned")
    }

    /// Applies a counter mutation, then re-evaluates `idle` and re-arms or
    /// disarms the stop timer. Single writer at a time.
    fn update(&self, mutate: impl FnOnce(&mut ControlState)) {
        let mut state = self.lock();
        mutate(&mut state);

        if state.phase == Phase::Stopped {
            return;
        }

        let idle = state.bound_clients == 0 && state.active_tasks == 0;
        // Either way any pending timer is invalidated first.
        state.epoch += 1;

        if idle {
            state.phase = Phase::StopPending;
            let epoch = state.epoch;
            drop(state);
            self.arm(epoch);
        } else {
            state.phase = Phase::Active;
        }
    }

    /// Arms the debounce timer for `epoch` on the configured executor. The
    /// spawned timer holds a weak back-reference only.
    fn arm(&self, epoch: u64) {
        let weak: Weak<LifecycleInner> = Arc::downgrade(&self.inner);
        let debounce = self.inner.debounce;

        self.inner.executor.spawn(Box::pin(async move {
            tokio::time::sleep(debounce).await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.state.lock().expect("lifecycle state poisoned");
            let still_idle = state.bound_clients == 0 && state.active_tasks == 0;
            if state.phase == Phase::StopPending && state.epoch == epoch && still_idle {
                state.phase = Phase::Stopped;
                drop(state);
                tracing::debug!("idle window elapsed; stopping host");
                inner.stop.cancel();
            }
        }));
    }
}
