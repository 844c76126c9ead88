// src/engine/scheduler.rs

//! Bounded worker pool that drives one run of a DAG.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dag::{Dag, DagView, TaskId};
use crate::exec::TaskExecutor;
use crate::types::TaskStatus;

use super::board::StatusBoard;
use super::queue::WorkQueue;
use super::worker::{WorkerContext, lock_board, run_worker};

/// Owns the run state of one project.
///
/// The DAG is shared read-only between workers; every status lives in the
/// [`StatusBoard`] behind a single lock.
pub struct Scheduler {
    dag: Arc<Dag>,
    board: Arc<Mutex<StatusBoard>>,
    executor: Arc<dyn TaskExecutor>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("dag", &self.dag.name())
            .field("tasks", &self.dag.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(dag: Dag, executor: Arc<dyn TaskExecutor>) -> Self {
        let board = StatusBoard::new(dag.len());
        Self {
            dag: Arc::new(dag),
            board: Arc::new(Mutex::new(board)),
            executor,
        }
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn status_of(&self, id: TaskId) -> TaskStatus {
        lock_board(&self.board).status(id)
    }

    /// Whether no task has been touched yet.
    pub fn is_pristine(&self) -> bool {
        lock_board(&self.board).all_none()
    }

    /// Copy of the board under the lock.
    pub fn board(&self) -> StatusBoard {
        lock_board(&self.board).clone()
    }

    /// Snapshot of the graph with the current statuses.
    pub fn view(&self) -> DagView {
        let board = self.board();
        self.dag.view(|id| board.status(id))
    }

    /// Seed the origin, run `pool_size` workers until the queue drains, then
    /// stop them.
    ///
    /// Returns false without running anything if a run already touched the
    /// board; the check and the seeding happen under one lock.
    pub async fn execute(&self, pool_size: usize) -> bool {
        let origin = self.dag.origin();
        let started = lock_board(&self.board).try_start(origin);
        if !started {
            return false;
        }

        let pool_size = pool_size.max(1);
        let queue = Arc::new(WorkQueue::new());
        let cancel = CancellationToken::new();
        queue.push(origin);

        info!(project = %self.dag.name(), workers = pool_size, "starting run");

        let ctx = WorkerContext {
            dag: Arc::clone(&self.dag),
            board: Arc::clone(&self.board),
            executor: Arc::clone(&self.executor),
            queue: Arc::clone(&queue),
        };

        let handles: Vec<_> = (0..pool_size)
            .map(|worker| tokio::spawn(run_worker(worker, ctx.clone(), cancel.clone())))
            .collect();

        queue.join().await;
        cancel.cancel();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker terminated abnormally");
            }
        }

        info!(project = %self.dag.name(), "run finished");
        true
    }
}
