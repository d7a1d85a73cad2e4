//! # Lane registry: queue name → execution lane.
//!
//! Resolves a [`Queue`] to the lane that will run a submission. Lanes are
//! created lazily on first use of a name and cached for the registry's
//! lifetime. [`Queue::Direct`] bypasses lanes entirely and spawns straight
//! on the executor.

use std::collections::HashMap;
use std::sync::Mutex;

use super::lane::{Job, Lane};
use super::{Executor, Queue};

/// Monotonically growing map of queue name → lane.
pub struct LaneRegistry {
    lanes: Mutex<HashMap<Box<str>, Lane>>,
    executor: Executor,
}

impl LaneRegistry {
    /// Creates an empty registry bound to `executor`.
    ///
    /// The executor is fixed for the registry's lifetime; every lane created
    /// here spawns its worker on it.
    pub fn new(executor: Executor) -> Self {
        Self {
            lanes: Mutex::new(HashMap::new()),
            executor,
        }
    }

    /// Routes a job to the lane for `queue`, creating the lane on first use.
    ///
    /// Direct submissions skip ordering and go straight to the executor.
    pub(crate) fn submit(&self, queue: &Queue, job: Job) {
        match queue.name() {
            None => self.executor.spawn(job),
            Some(name) => {
                let mut lanes = self.lanes.lock().expect("lane registry poisoned");
                let lane = lanes
                    .entry(Box::from(&*name))
                    .or_insert_with(|| Lane::spawn(&name, &self.executor));
                lane.enqueue(job);
            }
        }
    }

    /// Number of lanes created so far.
    pub fn lane_count(&self) -> usize {
        self.lanes.lock().expect("lane registry poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn lanes_are_created_lazily_and_cached() {
        let registry = Arc::new(LaneRegistry::new(Executor::Runtime));
        assert_eq!(registry.lane_count(), 0);

        let (tx, mut rx) = mpsc::unbounded_channel();
        for _ in 0..3 {
            let tx = tx.clone();
            registry.submit(
                &Queue::named("files"),
                Box::pin(async move {
                    let _ = tx.send(());
                }),
            );
        }
        assert_eq!(registry.lane_count(), 1);

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
    }

    #[tokio::test]
    async fn direct_submissions_do_not_create_lanes() {
        let registry = LaneRegistry::new(Executor::Runtime);
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.submit(
            &Queue::Direct,
            Box::pin(async move {
                let _ = tx.send(());
            }),
        );
        rx.recv().await.unwrap();
        assert_eq!(registry.lane_count(), 0);
    }
}
