// src/dag/view.rs

//! Serializable snapshot of a built DAG for reporting and dry runs.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::dag::graph::Dag;
use crate::dag::task::{TaskId, TaskKind};
use crate::errors::Result;
use crate::types::{DependencyCondition, DependencyOperator, TaskStatus};

/// Output format for [`DagView::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DagFormat {
    /// HTTP and REST friendly.
    #[default]
    Json,
    /// Human readable.
    Yaml,
}

impl FromStr for DagFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(DagFormat::Json),
            "yaml" | "yml" => Ok(DagFormat::Yaml),
            other => Err(format!("invalid DAG format: {other} (expected \"json\" or \"yaml\")")),
        }
    }
}

/// Task name -> task snapshot, ordered by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DagView {
    pub tasks: BTreeMap<String, TaskView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub status: TaskStatus,
    pub enabled: bool,
    /// Variant tag (`type`) and the variant's own fields.
    #[serde(flatten)]
    pub kind: TaskKind,
    pub dependents: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyView {
    pub task: String,
    pub condition: DependencyCondition,
    pub operator: DependencyOperator,
}

impl DagView {
    /// Snapshot `dag` using `status_of` for the current statuses.
    pub fn new<F>(dag: &Dag, status_of: F) -> Self
    where
        F: Fn(TaskId) -> TaskStatus,
    {
        let tasks = dag
            .tasks()
            .map(|task| {
                let view = TaskView {
                    status: status_of(task.id()),
                    enabled: task.enabled(),
                    kind: task.kind().clone(),
                    dependents: task
                        .dependents()
                        .iter()
                        .map(|id| dag.task(*id).name().to_string())
                        .collect(),
                    dependencies: task
                        .dependencies()
                        .iter()
                        .map(|d| DependencyView {
                            task: dag.task(d.target()).name().to_string(),
                            condition: d.condition(),
                            operator: d.operator(),
                        })
                        .collect(),
                };
                (task.name().to_string(), view)
            })
            .collect();

        Self { tasks }
    }

    pub fn render(&self, format: DagFormat) -> Result<String> {
        let rendered = match format {
            DagFormat::Json => serde_json::to_string_pretty(self)?,
            DagFormat::Yaml => serde_yaml::to_string(self)?,
        };
        Ok(rendered)
    }
}

impl Dag {
    /// Convenience for [`DagView::new`].
    pub fn view<F>(&self, status_of: F) -> DagView
    where
        F: Fn(TaskId) -> TaskStatus,
    {
        DagView::new(self, status_of)
    }
}
