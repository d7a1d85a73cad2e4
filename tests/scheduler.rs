//! Scheduler façade behavior: per-queue ordering, cross-queue concurrency,
//! cancellation, and lifecycle event emission.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use queuevisor::{
    Event, EventKind, Listen, LogListener, Queue, ScheduleError, Scheduler, TaskError, TaskFn,
    TaskRef, DEFAULT_QUEUE,
};

/// Routes crate logs to the test harness; `RUST_LOG` controls verbosity.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Listener forwarding every event kind into a channel.
struct KindTap {
    tx: mpsc::UnboundedSender<EventKind>,
}

impl Listen for KindTap {
    fn on_event(&self, event: &Event) {
        let _ = self.tx.send(event.kind);
    }
}

#[tokio::test]
async fn tasks_on_one_queue_run_in_submission_order() {
    let sched = Scheduler::default();
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut futures = Vec::new();
    for i in 0..16usize {
        let order = Arc::clone(&order);
        let task: TaskRef<()> = TaskFn::arc(format!("t{i}"), move |_ctx: CancellationToken| {
            let order = Arc::clone(&order);
            async move {
                order.lock().unwrap().push(i);
                Ok::<(), TaskError>(())
            }
        });
        futures.push(sched.schedule(Queue::named("serial"), task).unwrap());
    }

    for fut in &futures {
        assert!(fut.outcome().await.is_success());
    }
    assert_eq!(*order.lock().unwrap(), (0..16).collect::<Vec<_>>());
    assert_eq!(sched.lane_count(), 1);
}

#[tokio::test]
async fn distinct_queues_run_concurrently() {
    let sched = Scheduler::default();

    // "a" blocks until "b" has run; only possible if the lanes are parallel.
    let (tx, rx) = oneshot::channel::<()>();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let tx = Arc::new(Mutex::new(Some(tx)));

    let waiter: TaskRef<()> = TaskFn::arc("waiter", move |_ctx: CancellationToken| {
        let rx = rx.lock().unwrap().take();
        async move {
            rx.expect("waiter runs once")
                .await
                .map_err(|_| TaskError::fail("unblocker dropped"))?;
            Ok(())
        }
    });
    let unblocker: TaskRef<()> = TaskFn::arc("unblocker", move |_ctx: CancellationToken| {
        let tx = tx.lock().unwrap().take();
        async move {
            if let Some(tx) = tx {
                let _ = tx.send(());
            }
            Ok::<(), TaskError>(())
        }
    });

    let fa = sched.schedule(Queue::named("a"), waiter).unwrap();
    let fb = sched.schedule(Queue::named("b"), unblocker).unwrap();

    let both = async {
        assert!(fa.outcome().await.is_success());
        assert!(fb.outcome().await.is_success());
    };
    tokio::time::timeout(Duration::from_secs(5), both)
        .await
        .expect("queues deadlocked; lanes are not independent");
    assert_eq!(sched.lane_count(), 2);
}

#[tokio::test]
async fn cancel_before_start_skips_the_task() {
    let sched = Scheduler::default();

    // Occupy the lane so the victim stays queued.
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let release_rx = Arc::new(Mutex::new(Some(release_rx)));
    let blocker: TaskRef<()> = TaskFn::arc("blocker", move |_ctx: CancellationToken| {
        let rx = release_rx.lock().unwrap().take();
        async move {
            if let Some(rx) = rx {
                let _ = rx.await;
            }
            Ok::<(), TaskError>(())
        }
    });

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let victim: TaskRef<()> = TaskFn::arc("victim", move |_ctx: CancellationToken| {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<(), TaskError>(())
        }
    });

    let _blocked = sched.schedule(Queue::named("q"), blocker).unwrap();
    let fut = sched.schedule(Queue::named("q"), victim).unwrap();

    fut.cancel();
    fut.cancel(); // idempotent
    let _ = release_tx.send(());

    let outcome = fut.outcome().await;
    assert!(outcome.is_canceled());
    assert!(!ran.load(Ordering::SeqCst), "canceled task must not run");
}

#[tokio::test]
async fn running_task_cancels_cooperatively() {
    let sched = Scheduler::default();
    let task: TaskRef<()> = TaskFn::arc("looper", |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Err::<(), TaskError>(TaskError::Canceled)
    });

    let fut = sched.schedule(Queue::named("q"), task).unwrap();
    // Give the lane a chance to start the task before canceling.
    tokio::time::sleep(Duration::from_millis(20)).await;
    fut.cancel();

    assert!(fut.outcome().await.is_canceled());
}

#[tokio::test]
async fn emits_one_terminal_event_per_submission() {
    let sched = Scheduler::default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    sched.add_listener(Arc::new(KindTap { tx }));

    let task: TaskRef<()> = TaskFn::arc("failer", |_ctx: CancellationToken| async move {
        Err::<(), _>(TaskError::fail("boom"))
    });
    let fut = sched.schedule(Queue::Default, task).unwrap();
    assert!(fut.outcome().await.is_failure());

    assert_eq!(rx.recv().await, Some(EventKind::TaskScheduled));
    assert_eq!(rx.recv().await, Some(EventKind::TaskStarting));
    assert_eq!(rx.recv().await, Some(EventKind::TaskFailed));
}

#[tokio::test]
async fn scheduled_event_fires_before_the_task_runs() {
    let sched = Scheduler::default();
    let seen = Arc::new(AtomicUsize::new(0));

    struct CountScheduled(Arc<AtomicUsize>);
    impl Listen for CountScheduled {
        fn on_event(&self, event: &Event) {
            if event.kind == EventKind::TaskScheduled {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
    sched.add_listener(Arc::new(CountScheduled(Arc::clone(&seen))));

    let task: TaskRef<()> = TaskFn::arc("noop", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });
    let _fut = sched.schedule(Queue::named("q"), task).unwrap();

    // Synchronous: observable immediately after schedule() returns.
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn task_panic_becomes_a_failure_and_lane_survives() {
    init_tracing();
    let sched = Scheduler::default();

    let bomb: TaskRef<()> = TaskFn::arc("bomb", |_ctx: CancellationToken| async move {
        if true {
            panic!("task blew up");
        }
        Ok::<(), TaskError>(())
    });
    let after: TaskRef<u32> = TaskFn::arc("after", |_ctx: CancellationToken| async move {
        Ok::<u32, TaskError>(11)
    });

    let f1 = sched.schedule(Queue::named("q"), bomb).unwrap();
    let f2 = sched.schedule(Queue::named("q"), after).unwrap();

    let o1 = f1.outcome().await;
    assert!(o1.is_failure());
    assert!(o1.failure().unwrap().as_message().contains("task blew up"));

    // The lane keeps draining after a panicking task.
    assert_eq!(f2.outcome().await.value(), Some(&11));
}

#[tokio::test]
async fn empty_queue_name_is_rejected_synchronously() {
    let sched = Scheduler::default();
    let task: TaskRef<()> = TaskFn::arc("noop", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });
    let err = sched.schedule(Queue::named(""), task).unwrap_err();
    assert_eq!(err, ScheduleError::EmptyQueueName);
}

#[tokio::test]
async fn default_queue_shares_the_named_default_lane() {
    init_tracing();
    let sched = Scheduler::default();
    sched.add_listener(Arc::new(LogListener));

    let a: TaskRef<()> = TaskFn::arc("a", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });
    let b: TaskRef<()> = TaskFn::arc("b", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });

    let fa = sched.schedule(Queue::Default, a).unwrap();
    let fb = sched.schedule(Queue::named(DEFAULT_QUEUE), b).unwrap();
    assert!(fa.outcome().await.is_success());
    assert!(fb.outcome().await.is_success());

    // Queue::Default is just the named "default" lane.
    assert_eq!(sched.lane_count(), 1);
}

#[tokio::test]
async fn removed_listener_receives_no_further_events() {
    struct CountScheduled(Arc<AtomicUsize>);
    impl Listen for CountScheduled {
        fn on_event(&self, event: &Event) {
            if event.kind == EventKind::TaskScheduled {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let sched = Scheduler::default();
    let seen = Arc::new(AtomicUsize::new(0));
    let listener: Arc<dyn Listen> = Arc::new(CountScheduled(Arc::clone(&seen)));
    sched.add_listener(listener.clone());

    let first: TaskRef<()> = TaskFn::arc("first", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });
    sched.schedule(Queue::named("q"), first).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    assert!(sched.remove_listener(&listener));
    let second: TaskRef<()> = TaskFn::arc("second", |_ctx: CancellationToken| async move {
        Ok::<(), TaskError>(())
    });
    sched.schedule(Queue::named("q"), second).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn direct_submissions_bypass_lanes() {
    let sched = Scheduler::default();
    let task: TaskRef<u32> = TaskFn::arc("direct", |_ctx: CancellationToken| async move {
        Ok::<u32, TaskError>(5)
    });
    let fut = sched.schedule(Queue::Direct, task).unwrap();
    assert_eq!(fut.outcome().await.value(), Some(&5));
    assert_eq!(sched.lane_count(), 0);
}
