// src/dag/graph.rs

use std::collections::HashMap;

use crate::dag::task::{Task, TaskId};

/// The linked task graph, rooted at the origin task.
///
/// All tasks live in one arena owned by the graph. Dependency edges and
/// dependent lists hold [`TaskId`] handles into it, so both directions can
/// be walked without reference cycles. The graph is immutable once the
/// builder returns it.
#[derive(Debug, Clone)]
pub struct Dag {
    name: String,
    origin: TaskId,
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
}

impl Dag {
    pub(crate) fn new(name: String, origin: TaskId, tasks: Vec<Task>) -> Self {
        let index = tasks
            .iter()
            .map(|t| (t.name().to_string(), t.id()))
            .collect();
        Self {
            name,
            origin,
            tasks,
            index,
        }
    }

    /// Project name, which is also the origin task's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> TaskId {
        self.origin
    }

    /// Number of tasks including the origin.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by handle.
    ///
    /// Handles only come from this graph, so an out-of-range id is a bug and
    /// panics like a slice index would.
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.index()]
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.index.get(name).map(|id| self.task(*id))
    }

    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.index.get(name).copied()
    }

    /// All tasks in arena order (origin first).
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name())
    }

    /// Names of the direct prerequisites of a task, in edge order.
    pub fn dependency_names(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|t| {
                t.dependencies()
                    .iter()
                    .map(|d| self.task(d.target()).name())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of the direct dependents of a task.
    pub fn dependent_names(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|t| t.dependents().iter().map(|id| self.task(*id).name()).collect())
            .unwrap_or_default()
    }
}
