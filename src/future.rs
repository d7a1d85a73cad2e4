//! # Observable future: single-assignment, multi-subscriber task outcome.
//!
//! [`ObservableFuture`] wraps the eventual [`Outcome`] of one submission.
//! It is `PENDING` until exactly one terminal transition happens; terminal
//! states are sticky.
//!
//! ## Notification invariant
//! A subscriber receives **exactly one** terminal notification, regardless of
//! whether it subscribed before, during, or after completion:
//!
//! - subscribe while pending → callback stored, invoked on completion from
//!   the completing lane worker;
//! - subscribe after terminal → callback invoked inline with the stored
//!   outcome.
//!
//! The transition itself is a first-wins compare-and-set under the state
//! lock; "terminal after subscribe" and "subscribe after terminal" are the
//! two linearizable orderings and both deliver once. Subscribers are
//! `FnOnce`, so double delivery is unrepresentable.
//!
//! ## Cancellation
//! [`cancel`](ObservableFuture::cancel) requests cooperative cancellation via
//! the submission's [`CancellationToken`]. If the task has not started yet,
//! the future transitions to `Canceled` immediately and the lane skips the
//! task when it reaches it. If the task is already running, cancellation is
//! best-effort: the task is asked to stop but may still complete normally —
//! whichever transition occurs first wins and the other is suppressed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Terminal outcome of a submission.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Task completed and produced a value.
    Success(T),
    /// Task failed.
    Failure(TaskError),
    /// Submission was canceled before or during execution.
    Canceled,
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True for [`Outcome::Failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// True for [`Outcome::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, Outcome::Canceled)
    }

    /// The failure, if this outcome is one.
    pub fn failure(&self) -> Option<&TaskError> {
        match self {
            Outcome::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// The produced value, if this outcome is a success.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

type Callback<T> = Box<dyn FnOnce(Arc<Outcome<T>>) + Send>;

enum State<T> {
    /// Pending, with the append-only subscriber list.
    Pending(Vec<Callback<T>>),
    /// Sticky terminal state.
    Done(Arc<Outcome<T>>),
}

struct Inner<T> {
    state: Mutex<State<T>>,
    /// Set by the lane wrapper just before the task runs. Distinguishes
    /// "remove from lane" from "ask a running task to stop".
    started: AtomicBool,
    token: CancellationToken,
}

/// Multi-subscriber handle to one submission's eventual outcome.
///
/// Cheap to clone; all clones observe the same state.
pub struct ObservableFuture<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ObservableFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ObservableFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terminal = matches!(
            *self.inner.state.lock().expect("future state poisoned"),
            State::Done(_)
        );
        f.debug_struct("ObservableFuture")
            .field("terminal", &terminal)
            .field("started", &self.inner.started.load(Ordering::Acquire))
            .finish()
    }
}

impl<T: Send + Sync + 'static> ObservableFuture<T> {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Pending(Vec::new())),
                started: AtomicBool::new(false),
                token,
            }),
        }
    }

    /// Registers `observer` for a terminal notification.
    ///
    /// If the future is already terminal the observer is invoked inline with
    /// the stored outcome; otherwise it is invoked once, from the completing
    /// lane worker, when the terminal transition happens.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: FnOnce(Arc<Outcome<T>>) + Send + 'static,
    {
        let outcome = {
            let mut state = self.inner.state.lock().expect("future state poisoned");
            match &mut *state {
                State::Pending(subs) => {
                    subs.push(Box::new(observer));
                    return;
                }
                State::Done(outcome) => Arc::clone(outcome),
            }
        };
        // Already terminal: notify inline, outside the lock.
        observer(outcome);
    }

    /// Requests cancellation of this submission.
    ///
    /// If the task has not started, the future transitions to `Canceled`
    /// right away and the lane will skip the task. If the task is running,
    /// the request is cooperative. Idempotent; a no-op on a terminal future.
    pub fn cancel(&self) {
        self.inner.token.cancel();
        if !self.inner.started.load(Ordering::Acquire) {
            self.complete(Outcome::Canceled);
        }
    }

    /// True once a terminal transition happened.
    pub fn is_terminal(&self) -> bool {
        matches!(
            *self.inner.state.lock().expect("future state poisoned"),
            State::Done(_)
        )
    }

    /// The terminal outcome, if one was recorded already.
    pub fn outcome_now(&self) -> Option<Arc<Outcome<T>>> {
        match &*self.inner.state.lock().expect("future state poisoned") {
            State::Done(outcome) => Some(Arc::clone(outcome)),
            State::Pending(_) => None,
        }
    }

    /// Waits for the terminal outcome.
    pub async fn outcome(&self) -> Arc<Outcome<T>> {
        let (tx, rx) = oneshot::channel();
        self.subscribe(move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.expect("completed future dropped its outcome")
    }

    /// First-wins terminal transition.
    ///
    /// Returns `true` when this call performed the transition; `false` when
    /// another outcome already won. Subscribers registered while pending are
    /// drained and notified outside the lock, each exactly once.
    pub(crate) fn complete(&self, outcome: Outcome<T>) -> bool {
        let (subs, outcome) = {
            let mut state = self.inner.state.lock().expect("future state poisoned");
            match &mut *state {
                State::Done(_) => return false,
                State::Pending(subs) => {
                    let subs = std::mem::take(subs);
                    let outcome = Arc::new(outcome);
                    *state = State::Done(Arc::clone(&outcome));
                    (subs, outcome)
                }
            }
        };
        for sub in subs {
            sub(Arc::clone(&outcome));
        }
        true
    }

    /// Marks the task as started. Called by the lane wrapper immediately
    /// before running the task.
    pub(crate) fn mark_started(&self) {
        self.inner.started.store(true, Ordering::Release);
    }

    /// Token scoped to this submission.
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.inner.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn pending() -> ObservableFuture<u32> {
        ObservableFuture::new(CancellationToken::new())
    }

    #[test]
    fn subscribe_before_completion_notifies_once() {
        let fut = pending();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        fut.subscribe(move |outcome| {
            assert_eq!(outcome.value(), Some(&7));
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert!(fut.complete(Outcome::Success(7)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribe_after_completion_notifies_inline() {
        let fut = pending();
        assert!(fut.complete(Outcome::Success(3)));

        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        fut.subscribe(move |outcome| {
            assert!(outcome.is_success());
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn terminal_state_is_sticky() {
        let fut = pending();
        assert!(fut.complete(Outcome::Canceled));
        assert!(!fut.complete(Outcome::Success(1)));
        assert!(fut.outcome_now().unwrap().is_canceled());
    }

    #[test]
    fn cancel_before_start_is_immediate_and_idempotent() {
        let fut = pending();
        fut.cancel();
        fut.cancel();
        assert!(fut.token().is_cancelled());
        assert!(fut.outcome_now().unwrap().is_canceled());
    }

    #[test]
    fn cancel_after_terminal_is_noop() {
        let fut = pending();
        assert!(fut.complete(Outcome::Success(5)));
        fut.cancel();
        assert!(fut.outcome_now().unwrap().is_success());
    }

    #[test]
    fn cancel_while_started_does_not_complete() {
        let fut = pending();
        fut.mark_started();
        fut.cancel();
        // Only the token is flipped; the running task decides the outcome.
        assert!(fut.token().is_cancelled());
        assert!(!fut.is_terminal());
        assert!(fut.complete(Outcome::Success(9)));
        assert!(fut.outcome_now().unwrap().is_success());
    }

    #[test]
    fn handles_cross_thread_boundaries() {
        fn assert_send_sync<V: Send + Sync>() {}
        assert_send_sync::<ObservableFuture<u32>>();
        assert_send_sync::<Arc<Outcome<u32>>>();
    }

    #[test]
    fn debug_output_reflects_terminal_state() {
        let fut = pending();
        assert!(format!("{fut:?}").contains("terminal: false"));
        fut.complete(Outcome::Success(1));
        assert!(format!("{fut:?}").contains("terminal: true"));
    }

    #[test]
    fn every_subscriber_gets_the_outcome() {
        let fut = pending();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let h = hits.clone();
            fut.subscribe(move |_| {
                h.fetch_add(1, Ordering::SeqCst);
            });
        }
        fut.complete(Outcome::Failure(TaskError::fail("boom")));
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }
}
