//! # Scheduler façade: named-queue task dispatch.
//!
//! [`Scheduler`] is the entry point: it accepts a queue identifier and a
//! task, resolves the lane through the [`LaneRegistry`], emits lifecycle
//! events through the [`ListenerSet`], and returns an
//! [`ObservableFuture`] bound 1:1 to the submission.
//!
//! ## Event flow per submission
//! ```text
//! schedule(queue, task)
//!   ├─► validate queue name (sync error, never deferred into the queue)
//!   ├─► emit TaskScheduled        (sync, before the task can run)
//!   └─► enqueue wrapper job on the lane
//!
//! lane worker picks the job up:
//!   ├─ canceled before start? ──► complete(Canceled), emit TaskCanceled
//!   └─ else:
//!        ├─► mark started, emit TaskStarting
//!        ├─► run task (panics captured as failures)
//!        └─► first-wins terminal transition, then emit exactly one of
//!            TaskFinished / TaskCanceled / TaskFailed — matching the
//!            outcome that actually won
//! ```
//!
//! The wrapper runs exactly once per submission, so exactly one terminal
//! event is emitted per submission, even when a concurrent `cancel` races
//! with completion.

use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::{ScheduleError, TaskError};
use crate::events::{Event, EventKind, Listen, ListenerSet};
use crate::future::{ObservableFuture, Outcome};
use crate::lanes::{Executor, LaneRegistry, Queue};
use crate::tasks::TaskRef;

/// Named-queue task scheduler.
///
/// Tasks submitted to the same named queue execute in submission order, one
/// at a time; tasks on different queues may run concurrently. The backing
/// [`Executor`] is fixed at construction.
pub struct Scheduler {
    lanes: LaneRegistry,
    listeners: Arc<ListenerSet>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Executor::Runtime)
    }
}

impl Scheduler {
    /// Creates a scheduler bound to `executor`.
    pub fn new(executor: Executor) -> Self {
        Self {
            lanes: LaneRegistry::new(executor),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    /// Schedules `task` on `queue` and returns the future for its outcome.
    ///
    /// Emits `TaskScheduled` synchronously before the task is handed to the
    /// lane, so listeners can react before any work starts. Invalid
    /// submissions fail here, never inside the queue.
    pub fn schedule<T: Send + Sync + 'static>(
        &self,
        queue: Queue,
        task: TaskRef<T>,
    ) -> Result<ObservableFuture<T>, ScheduleError> {
        if let Queue::Named(name) = &queue {
            if name.is_empty() {
                return Err(ScheduleError::EmptyQueueName);
            }
        }

        let task_name: Arc<str> = Arc::from(task.name());
        let queue_name = queue.name();
        let future = ObservableFuture::new(CancellationToken::new());

        self.listeners.emit(
            &Event::new(EventKind::TaskScheduled)
                .with_task(Arc::clone(&task_name))
                .with_queue_opt(queue_name.clone()),
        );

        let listeners = Arc::clone(&self.listeners);
        let fut = future.clone();
        let job = Box::pin(async move {
            run_submission(task, task_name, queue_name, fut, listeners).await;
        });
        self.lanes.submit(&queue, job);

        Ok(future)
    }

    /// Registers a lifecycle listener. Safe from any thread.
    pub fn add_listener(&self, listener: Arc<dyn Listen>) {
        self.listeners.add(listener);
    }

    /// Removes a previously registered listener (by identity).
    pub fn remove_listener(&self, listener: &Arc<dyn Listen>) -> bool {
        self.listeners.remove(listener)
    }

    /// Number of lanes created so far (distinct queue names used).
    pub fn lane_count(&self) -> usize {
        self.lanes.lane_count()
    }
}

/// Runs one submission on its lane: cancellation check, execution, terminal
/// transition, and exactly one terminal event.
async fn run_submission<T: Send + Sync + 'static>(
    task: TaskRef<T>,
    task_name: Arc<str>,
    queue_name: Option<Arc<str>>,
    fut: ObservableFuture<T>,
    listeners: Arc<ListenerSet>,
) {
    // Canceled while still queued: skip the task entirely.
    if fut.token().is_cancelled() || fut.is_terminal() {
        fut.complete(Outcome::Canceled);
        listeners.emit(
            &Event::new(EventKind::TaskCanceled)
                .with_task(task_name)
                .with_queue_opt(queue_name),
        );
        return;
    }

    fut.mark_started();
    listeners.emit(
        &Event::new(EventKind::TaskStarting)
            .with_task(Arc::clone(&task_name))
            .with_queue_opt(queue_name.clone()),
    );

    let token = fut.token().clone();
    let result = match std::panic::AssertUnwindSafe(task.run(token))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => Err(TaskError::fail(crate::events::panic_message(&panic))),
    };

    match result {
        Ok(value) => {
            fut.complete(Outcome::Success(value));
        }
        Err(TaskError::Canceled) => {
            fut.complete(Outcome::Canceled);
        }
        Err(err) => {
            fut.complete(Outcome::Failure(err));
        }
    }

    // A concurrent cancel may have won the transition; the event must match
    // the outcome that is actually recorded.
    let outcome = fut
        .outcome_now()
        .expect("submission just reached a terminal state");
    let event = match &*outcome {
        Outcome::Success(_) => Event::new(EventKind::TaskFinished),
        Outcome::Canceled => Event::new(EventKind::TaskCanceled),
        Outcome::Failure(err) => Event::new(EventKind::TaskFailed).with_reason(err.as_message()),
    };
    listeners.emit(&event.with_task(task_name).with_queue_opt(queue_name));
}
