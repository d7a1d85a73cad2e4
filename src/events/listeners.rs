//! # Synchronous event fan-out to registered listeners.
//!
//! [`ListenerSet`] delivers every emitted [`Event`] to all currently
//! registered listeners, in registration order, on the emitting thread.
//!
//! ## Rules
//! - **Snapshot semantics**: `emit` copies the listener list under the lock
//!   and invokes outside it; a listener added during a callback is not
//!   invoked for the event in progress.
//! - **Isolation**: a panicking listener does not abort delivery to
//!   subsequent listeners. The panic is caught and reported via
//!   `tracing::warn!`. Listeners are instrumentation; they must not be able
//!   to corrupt scheduler state.
//! - **Identity removal**: `remove` compares `Arc` pointer identity, so the
//!   caller unregisters exactly the instance it registered.
//! - Delivery order is guaranteed only relative to a single task's
//!   lifecycle, not across unrelated tasks.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use super::Event;

/// Contract for lifecycle event listeners.
///
/// Called synchronously from whichever thread completes the lifecycle step
/// (the scheduling caller for `TaskScheduled`, a lane worker for the rest).
/// Implementations must be quick and non-blocking; heavy work belongs behind
/// a channel.
pub trait Listen: Send + Sync + 'static {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Fan-out set for lifecycle listeners.
///
/// Membership is mutable from any thread; iteration order is insertion
/// order.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn Listen>>>,
}

impl ListenerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Appended after all current listeners.
    pub fn add(&self, listener: Arc<dyn Listen>) {
        self.listeners
            .lock()
            .expect("listener set poisoned")
            .push(listener);
    }

    /// Removes a previously registered listener by pointer identity.
    ///
    /// Returns `true` if the listener was present.
    pub fn remove(&self, listener: &Arc<dyn Listen>) -> bool {
        let mut listeners = self.listeners.lock().expect("listener set poisoned");
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().expect("listener set poisoned").len()
    }

    /// True when no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to a snapshot of the current listeners.
    ///
    /// A panicking listener is isolated: the panic is caught, reported, and
    /// delivery continues with the next listener.
    pub fn emit(&self, event: &Event) {
        let snapshot: Vec<Arc<dyn Listen>> = self
            .listeners
            .lock()
            .expect("listener set poisoned")
            .clone();

        for listener in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                let info = panic_message(&panic);
                tracing::warn!(
                    listener = listener.name(),
                    kind = ?event.kind,
                    panic = %info,
                    "listener panicked during event delivery"
                );
            }
        }
    }
}

/// Extracts a printable message from a caught panic payload.
pub(crate) fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
