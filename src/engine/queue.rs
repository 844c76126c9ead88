// src/engine/queue.rs

//! Shared FIFO work queue with drain tracking.

use tokio::sync::{Mutex, mpsc, watch};

use crate::dag::TaskId;

/// Unbounded multi-consumer queue of candidate tasks.
///
/// Every pushed item counts as outstanding until a worker calls
/// [`task_done`](WorkQueue::task_done) for it. [`join`](WorkQueue::join)
/// waits for that count to reach zero, which also covers items pushed while
/// other items were still being processed.
#[derive(Debug)]
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<TaskId>,
    rx: Mutex<mpsc::UnboundedReceiver<TaskId>>,
    outstanding: watch::Sender<usize>,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (outstanding, _) = watch::channel(0);
        Self {
            tx,
            rx: Mutex::new(rx),
            outstanding,
        }
    }

    /// Enqueue a task. Never blocks.
    pub fn push(&self, task: TaskId) {
        // Count first so a concurrent `join` cannot observe zero in between.
        self.outstanding.send_modify(|n| *n += 1);
        if self.tx.send(task).is_err() {
            // The receiver lives as long as `self`, so this is unreachable in
            // practice; keep the count consistent anyway.
            self.task_done();
        }
    }

    /// Wait for the next task. Workers take turns on the receiver.
    ///
    /// Cancel safe: dropping the future loses no item.
    pub async fn pop(&self) -> Option<TaskId> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Mark one popped item as fully processed.
    pub fn task_done(&self) {
        self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Number of items pushed but not yet marked done.
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Block until every pushed item has been marked done.
    pub async fn join(&self) {
        let mut rx = self.outstanding.subscribe();
        // The sender is owned by `self`, so the channel cannot close here.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
