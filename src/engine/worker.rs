// src/engine/worker.rs

//! Worker loop of the execution pool.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dag::{Dag, TaskId};
use crate::exec::TaskExecutor;
use crate::types::TaskStatus;

use super::TaskOutcome;
use super::board::{Claim, StatusBoard};
use super::queue::WorkQueue;

/// State shared by every worker of one run.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub dag: Arc<Dag>,
    pub board: Arc<Mutex<StatusBoard>>,
    pub executor: Arc<dyn TaskExecutor>,
    pub queue: Arc<WorkQueue>,
}

/// Take the project lock.
///
/// A worker never panics while holding it, but a poisoned lock still holds
/// consistent statuses, so recover instead of propagating the poison.
pub(crate) fn lock_board(board: &Mutex<StatusBoard>) -> MutexGuard<'_, StatusBoard> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pull tasks until `cancel` fires.
pub(crate) async fn run_worker(worker: usize, ctx: WorkerContext, cancel: CancellationToken) {
    debug!(worker, "worker started");

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            next = ctx.queue.pop() => next,
        };
        let Some(id) = next else { break };

        process(&ctx, id).await;
        ctx.queue.task_done();
    }

    debug!(worker, "worker stopped");
}

async fn process(ctx: &WorkerContext, id: TaskId) {
    let task = ctx.dag.task(id);
    let claim = lock_board(&ctx.board).claim(&ctx.dag, id);

    match claim {
        Claim::NotReady => {
            debug!(task = %task.name(), "task not ready; dropping delivery");
            return;
        }
        Claim::Skip => {
            info!(task = %task.name(), "skipping disabled task");
        }
        Claim::Execute => {
            let status = execute(ctx, id).await;
            lock_board(&ctx.board).complete(id, status);
            info!(task = %task.name(), %status, "task finished");
        }
    }

    propagate(ctx, id);
}

/// Run the executor in its own tokio task so a panic is contained.
async fn execute(ctx: &WorkerContext, id: TaskId) -> TaskStatus {
    let name = ctx.dag.task(id).name().to_string();
    info!(task = %name, "executing task");

    let dag = Arc::clone(&ctx.dag);
    let executor = Arc::clone(&ctx.executor);
    let handle = tokio::spawn(async move { executor.execute(dag.task(id)).await });

    match handle.await {
        Ok(Ok(TaskOutcome::Success)) => TaskStatus::Succeeded,
        Ok(Ok(TaskOutcome::Failed(code))) => {
            warn!(task = %name, exit_code = code, "task failed");
            TaskStatus::Failed
        }
        Ok(Err(err)) => {
            warn!(task = %name, error = %err, "task returned an error");
            TaskStatus::Failed
        }
        Err(join_err) => {
            warn!(task = %name, error = %join_err, "task panicked or was aborted");
            TaskStatus::Failed
        }
    }
}

/// Offer every dependent to the queue once more.
fn propagate(ctx: &WorkerContext, id: TaskId) {
    let task = ctx.dag.task(id);
    let mut board = lock_board(&ctx.board);

    for &dependent in task.dependents() {
        if board.requeue(dependent) {
            ctx.queue.push(dependent);
        } else {
            debug!(
                from = %task.name(),
                task = %ctx.dag.task(dependent).name(),
                "dependent already claimed; not re-queued"
            );
        }
    }
}
