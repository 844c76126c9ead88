// src/engine/board.rs

//! Per-run task statuses.
//!
//! The board is the only mutable state of a run. The scheduler wraps it in a
//! single `Mutex`, and every status read or write goes through that lock, so
//! a readiness check and the claim that follows it are one atomic step.

use std::collections::BTreeMap;

use crate::dag::{Dag, TaskId};
use crate::types::TaskStatus;

/// Result of a worker trying to claim a popped task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Not ready (yet, or any more). The delivery is dropped.
    NotReady,
    /// Ready and enabled. The task is now `EXECUTING` and owned by the caller.
    Execute,
    /// Ready but disabled. The status is left as is and the caller only
    /// propagates to dependents.
    Skip,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    statuses: Vec<TaskStatus>,
    execution_order: Vec<TaskId>,
}

impl StatusBoard {
    /// Every task starts at `NONE`.
    pub fn new(len: usize) -> Self {
        Self {
            statuses: vec![TaskStatus::None; len],
            execution_order: Vec::new(),
        }
    }

    pub fn status(&self, id: TaskId) -> TaskStatus {
        self.statuses[id.index()]
    }

    /// True before the first run has touched anything.
    pub fn all_none(&self) -> bool {
        self.statuses.iter().all(|s| *s == TaskStatus::None)
    }

    /// Queue the origin if nothing has run yet.
    ///
    /// Returns false, and changes nothing, when any task has left `NONE`.
    pub fn try_start(&mut self, origin: TaskId) -> bool {
        if !self.all_none() {
            return false;
        }
        self.statuses[origin.index()] = TaskStatus::Queued;
        true
    }

    /// Check readiness and, if ready and enabled, move the task to
    /// `EXECUTING` in the same step.
    pub fn claim(&mut self, dag: &Dag, id: TaskId) -> Claim {
        let task = dag.task(id);
        if !task.is_ready(|dep| self.status(dep)) {
            return Claim::NotReady;
        }

        if !task.enabled() {
            return Claim::Skip;
        }

        // The origin has no QUEUED precondition; guard it separately.
        if self.status(id) != TaskStatus::Queued {
            return Claim::NotReady;
        }

        self.statuses[id.index()] = TaskStatus::Executing;
        self.execution_order.push(id);
        Claim::Execute
    }

    /// Mark a dependent as `QUEUED` for another evaluation.
    ///
    /// Returns false, and changes nothing, if the task was already claimed or
    /// finished; such a task must not be delivered again.
    pub fn requeue(&mut self, id: TaskId) -> bool {
        let slot = &mut self.statuses[id.index()];
        if !slot.is_unclaimed() {
            return false;
        }
        *slot = TaskStatus::Queued;
        true
    }

    /// Record the terminal status of an executed task.
    pub fn complete(&mut self, id: TaskId, status: TaskStatus) {
        debug_assert!(status.is_terminal());
        self.statuses[id.index()] = status;
    }

    /// Tasks in the order they were claimed for execution.
    pub fn execution_order(&self) -> &[TaskId] {
        &self.execution_order
    }

    /// Status by task name, for reporting.
    pub fn snapshot(&self, dag: &Dag) -> BTreeMap<String, TaskStatus> {
        dag.tasks()
            .map(|t| (t.name().to_string(), self.status(t.id())))
            .collect()
    }
}
