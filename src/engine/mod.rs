// src/engine/mod.rs

//! Execution engine for mycelium.
//!
//! This module ties together:
//! - the status board (all per-run statuses behind one lock)
//! - the shared FIFO work queue with its drain wait
//! - the worker loop that claims, executes and propagates tasks
//! - the scheduler that owns the pool for one run
//! - the [`Project`] facade used by the CLI and library callers

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dag::Dag;
use crate::types::TaskStatus;

/// Outcome of a task execution for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

/// Result of [`Project::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub project: String,
    /// False when the project was not in a runnable state.
    pub started: bool,
    /// Final status of every task except the origin.
    pub statuses: BTreeMap<String, TaskStatus>,
    /// Tasks in the order workers claimed them, origin excluded.
    pub execution_order: Vec<String>,
}

impl RunReport {
    fn not_started(project: &Project) -> Self {
        Self {
            project: project.name().to_string(),
            started: false,
            statuses: BTreeMap::new(),
            execution_order: Vec::new(),
        }
    }

    fn from_board(dag: &Dag, board: &StatusBoard) -> Self {
        let origin = dag.origin();
        let mut statuses = board.snapshot(dag);
        statuses.remove(dag.task(origin).name());

        let execution_order = board
            .execution_order()
            .iter()
            .filter(|id| **id != origin)
            .map(|id| dag.task(*id).name().to_string())
            .collect();

        Self {
            project: dag.name().to_string(),
            started: true,
            statuses,
            execution_order,
        }
    }

    pub fn status(&self, task: &str) -> Option<TaskStatus> {
        self.statuses.get(task).copied()
    }

    /// Names of tasks that ended `FAILED`.
    pub fn failed(&self) -> Vec<&str> {
        self.with_status(TaskStatus::Failed)
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.with_status(TaskStatus::Succeeded)
    }

    /// Started and no task failed.
    pub fn is_success(&self) -> bool {
        self.started && self.failed().is_empty()
    }

    fn with_status(&self, status: TaskStatus) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|(_, s)| **s == status)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

pub mod board;
pub mod project;
pub mod queue;
pub mod scheduler;
mod worker;

pub use board::{Claim, StatusBoard};
pub use project::Project;
pub use queue::WorkQueue;
pub use scheduler::Scheduler;
