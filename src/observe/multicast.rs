//! # Multi-observer container with single terminal delivery.
//!
//! A [`Multicast`] fans a producer's terminal event — a result or an error —
//! out to every currently registered observer, and guarantees each observer
//! sees at most one terminal notification per production cycle:
//!
//! - the first `post_result`/`post_error` wins and is sticky;
//! - later posts are no-ops until [`reset`](Multicast::reset);
//! - an observer subscribing after the terminal post is notified inline with
//!   the stored event.
//!
//! Lazy producers can attach a trigger hook that fires when the first
//! observer subscribes, so nothing runs until someone is listening.

use std::sync::{Arc, Mutex};

use crate::error::TaskError;

/// Contract for observers of a data producer.
pub trait Observe<D>: Send + Sync + 'static {
    /// The producer delivered its data.
    fn on_result(&self, data: &D);

    /// The producer failed.
    fn on_error(&self, error: &TaskError);

    /// The producer was reset; previously delivered data is stale.
    fn on_reset(&self) {}
}

enum Terminal<D> {
    Result(D),
    Error(TaskError),
}

struct State<D> {
    observers: Vec<Arc<dyn Observe<D>>>,
    terminal: Option<Arc<Terminal<D>>>,
    triggered: bool,
}

type Trigger = Box<dyn Fn() + Send + Sync>;

/// Fan-out container for one producer.
pub struct Multicast<D> {
    state: Mutex<State<D>>,
    trigger: Option<Trigger>,
}

impl<D: Send + 'static> Default for Multicast<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Send + 'static> Multicast<D> {
    /// Creates an empty multicast with no trigger hook.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                observers: Vec::new(),
                terminal: None,
                triggered: false,
            }),
            trigger: None,
        }
    }

    /// Creates a multicast whose `trigger` fires when the first observer
    /// subscribes (once per production cycle).
    pub fn with_trigger(trigger: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(State {
                observers: Vec::new(),
                terminal: None,
                triggered: false,
            }),
            trigger: Some(Box::new(trigger)),
        }
    }

    /// Registers an observer.
    ///
    /// If a terminal event was already posted, the observer is notified
    /// inline and not retained for the current cycle.
    pub fn subscribe(&self, observer: Arc<dyn Observe<D>>) {
        let (inline, fire) = {
            let mut state = self.state.lock().expect("multicast state poisoned");
            if let Some(terminal) = &state.terminal {
                (Some(Arc::clone(terminal)), false)
            } else {
                state.observers.push(observer.clone());
                let fire = !state.triggered && state.observers.len() == 1;
                if fire {
                    state.triggered = true;
                }
                (None, fire)
            }
        };

        if let Some(terminal) = inline {
            deliver(&observer, &terminal);
        }
        if fire {
            if let Some(trigger) = &self.trigger {
                trigger();
            }
        }
    }

    /// Posts the result. First terminal post wins; later posts are ignored
    /// until [`reset`](Multicast::reset).
    pub fn post_result(&self, data: D) {
        self.post(Terminal::Result(data));
    }

    /// Posts an error. Same single-delivery rules as [`post_result`](Multicast::post_result).
    pub fn post_error(&self, error: TaskError) {
        self.post(Terminal::Error(error));
    }

    /// Clears the stored terminal event and notifies current observers that
    /// earlier data is stale. Observers stay registered; the trigger may fire
    /// again for the next cycle.
    pub fn reset(&self) {
        let observers = {
            let mut state = self.state.lock().expect("multicast state poisoned");
            state.terminal = None;
            state.triggered = !state.observers.is_empty();
            state.observers.clone()
        };
        for observer in &observers {
            observer.on_reset();
        }
    }

    /// Drops all observers. They receive no further notifications.
    pub fn cancel(&self) {
        let mut state = self.state.lock().expect("multicast state poisoned");
        state.observers.clear();
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.state
            .lock()
            .expect("multicast state poisoned")
            .observers
            .len()
    }

    fn post(&self, terminal: Terminal<D>) {
        let (observers, terminal) = {
            let mut state = self.state.lock().expect("multicast state poisoned");
            if state.terminal.is_some() {
                return;
            }
            let terminal = Arc::new(terminal);
            state.terminal = Some(Arc::clone(&terminal));
            (state.observers.clone(), terminal)
        };
        for observer in &observers {
            deliver(observer, &terminal);
        }
    }
}

fn deliver<D: Send + 'static>(observer: &Arc<dyn Observe<D>>, terminal: &Terminal<D>) {
    match terminal {
        Terminal::Result(data) => observer.on_result(data),
        Terminal::Error(error) => observer.on_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        results: AtomicUsize,
        errors: AtomicUsize,
        resets: AtomicUsize,
    }

    impl Observe<u32> for Recorder {
        fn on_result(&self, _data: &u32) {
            self.results.fetch_add(1, Ordering::SeqCst);
        }
        fn on_error(&self, _error: &TaskError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn terminal_is_delivered_once_per_observer() {
        let mc = Multicast::new();
        let obs = Arc::new(Recorder::default());
        mc.subscribe(obs.clone());

        mc.post_result(1);
        mc.post_result(2);
        mc.post_error(TaskError::fail("late"));

        assert_eq!(obs.results.load(Ordering::SeqCst), 1);
        assert_eq!(obs.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn late_subscriber_gets_stored_terminal_inline() {
        let mc = Multicast::new();
        mc.post_error(TaskError::fail("boom"));

        let obs = Arc::new(Recorder::default());
        mc.subscribe(obs.clone());
        assert_eq!(obs.errors.load(Ordering::SeqCst), 1);
        // Not retained for the finished cycle.
        assert_eq!(mc.observer_count(), 0);
    }

    #[test]
    fn trigger_fires_on_first_subscription_only() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let mc = Multicast::<u32>::with_trigger(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        mc.subscribe(Arc::new(Recorder::default()));
        mc.subscribe(Arc::new(Recorder::default()));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_clears_terminal_and_notifies() {
        let mc = Multicast::new();
        let obs = Arc::new(Recorder::default());
        mc.subscribe(obs.clone());

        mc.post_result(1);
        mc.reset();
        assert_eq!(obs.resets.load(Ordering::SeqCst), 1);

        // A new cycle can deliver again.
        mc.post_result(2);
        assert_eq!(obs.results.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancel_drops_observers() {
        let mc = Multicast::new();
        let obs = Arc::new(Recorder::default());
        mc.subscribe(obs.clone());
        mc.cancel();

        mc.post_result(1);
        assert_eq!(obs.results.load(Ordering::SeqCst), 0);
    }
}
