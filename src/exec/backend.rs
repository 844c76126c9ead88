// src/exec/backend.rs

//! Pluggable task executor abstraction.
//!
//! Workers talk to a `TaskExecutor` instead of running tasks themselves.
//! This keeps the scheduler independent of where work actually happens and
//! lets tests swap in a fake executor.
//!
//! - `LocalExecutor` is the default implementation used by `mycelium`.
//!   It runs `command` tasks as local processes and simulates the platform
//!   variants (`notebook`, `library`), which need an external compute
//!   platform this crate does not talk to.
//! - Tests provide their own `TaskExecutor` that, for example, records which
//!   tasks ran and returns scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::dag::{Task, TaskKind};
use crate::engine::TaskOutcome;
use crate::errors::Result;

use super::task_runner::run_command;

/// Boxed future returned by [`TaskExecutor::execute`].
pub type ExecuteFuture<'a> = Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + 'a>>;

/// Trait abstracting how a claimed task is executed.
///
/// Implementations are called from any worker, at most once per task per
/// run (the scheduler guarantees this). Returning `Err` or panicking is
/// allowed; the worker records either as a failed task and keeps going.
pub trait TaskExecutor: Send + Sync {
    fn execute<'a>(&'a self, task: &'a Task) -> ExecuteFuture<'a>;
}

/// Default executor used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl TaskExecutor for LocalExecutor {
    fn execute<'a>(&'a self, task: &'a Task) -> ExecuteFuture<'a> {
        Box::pin(async move {
            let outcome: Result<TaskOutcome> = match task.kind() {
                TaskKind::Origin => Ok(TaskOutcome::Success),
                TaskKind::Command(spec) => run_command(task.name(), spec)
                    .await
                    .map_err(Into::into),
                TaskKind::Notebook(spec) => {
                    info!(
                        task = %task.name(),
                        path = %spec.path,
                        timeout = spec.timeout,
                        transformation = %spec.transformation,
                        "no platform executor attached; simulating notebook run"
                    );
                    Ok(TaskOutcome::Success)
                }
                TaskKind::Library(spec) => {
                    info!(
                        task = %task.name(),
                        library = spec.library.as_deref().unwrap_or("-"),
                        "no platform executor attached; simulating library install"
                    );
                    Ok(TaskOutcome::Success)
                }
            };
            outcome
        })
    }
}
