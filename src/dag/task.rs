// src/dag/task.rs

//! Task entities and their variants.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::model::TaskDefinition;
use crate::dag::dependency::{Dependency, readiness};
use crate::errors::{MyceliumError, Result};
use crate::types::TaskStatus;

/// Handle of a task inside a [`Dag`](crate::dag::Dag).
///
/// The DAG owns every task in one arena; edges and dependents refer to each
/// other through these handles instead of references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub fn from_index(index: usize) -> Self {
        TaskId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A notebook job submitted to the compute platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookTask {
    #[serde(default = "default_path")]
    pub path: String,

    /// Advisory timeout in seconds, passed on to the executor.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_transformation")]
    pub transformation: String,

    /// Not exercised by the scheduler.
    #[serde(default)]
    pub retry: u32,

    /// `parameters:` left empty in YAML reads as no parameters.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_path() -> String {
    "./".to_string()
}

fn default_timeout() -> u64 {
    3600
}

fn default_transformation() -> String {
    "default".to_string()
}

/// A library installation on the compute platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
}

/// A local shell command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTask {
    pub cmd: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub retry: u32,
}

/// Closed set of task variants. Scheduling treats them all alike; only the
/// executor looks inside.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskKind {
    Origin,
    Notebook(NotebookTask),
    Library(LibraryTask),
    Command(CommandTask),
}

impl TaskKind {
    /// Map a definition's `type` tag to a variant and parse its fields.
    pub fn from_definition(def: &TaskDefinition) -> Result<Self> {
        let tag = def.type_tag().ok_or_else(|| {
            MyceliumError::ConfigError(format!("task '{}' has no string `type` attribute", def.name))
        })?;

        let kind = match tag {
            "notebook" | "databricksNotebook" => TaskKind::Notebook(parse_fields(def)?),
            "library" | "databricksLibrary" => TaskKind::Library(parse_fields(def)?),
            "command" => TaskKind::Command(parse_fields(def)?),
            other => {
                return Err(MyceliumError::UnknownTaskType {
                    task: def.name.clone(),
                    tag: other.to_string(),
                });
            }
        };
        Ok(kind)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TaskKind::Origin => "origin",
            TaskKind::Notebook(_) => "notebook",
            TaskKind::Library(_) => "library",
            TaskKind::Command(_) => "command",
        }
    }
}

fn parse_fields<T: serde::de::DeserializeOwned>(def: &TaskDefinition) -> Result<T> {
    serde_json::from_value(Value::Object(def.attributes.clone())).map_err(|e| {
        MyceliumError::ConfigError(format!("invalid attributes for task '{}': {e}", def.name))
    })
}

/// A unit of work in the DAG.
///
/// Status is not stored here: the scheduler keeps every status behind one
/// project-wide lock, and the graph itself is immutable once built.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    name: String,
    kind: TaskKind,
    enabled: bool,
    /// The `enabled` attribute written on the definition, if any.
    declared_enabled: Option<bool>,
    dependencies: Vec<Dependency>,
    dependents: Vec<TaskId>,
}

impl Task {
    pub(crate) fn origin(id: TaskId, project: &str) -> Self {
        Self {
            id,
            name: project.to_string(),
            kind: TaskKind::Origin,
            enabled: true,
            declared_enabled: None,
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    /// Task factory: build a task from its (pattern-merged) definition.
    pub(crate) fn from_definition(id: TaskId, def: &TaskDefinition) -> Result<Self> {
        let kind = TaskKind::from_definition(def)?;
        let declared_enabled = def.attributes.get("enabled").and_then(Value::as_bool);

        Ok(Self {
            id,
            name: def.name.clone(),
            kind,
            enabled: declared_enabled.unwrap_or(true),
            declared_enabled,
            dependencies: Vec::new(),
            dependents: Vec::new(),
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_origin(&self) -> bool {
        matches!(self.kind, TaskKind::Origin)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn dependents(&self) -> &[TaskId] {
        &self.dependents
    }

    /// Whether a worker may claim this task, given the current statuses.
    ///
    /// The origin is always ready. Every other task needs its dependency
    /// edges satisfied and must itself be `QUEUED`.
    pub fn is_ready<F>(&self, status_of: F) -> bool
    where
        F: Fn(TaskId) -> TaskStatus,
    {
        if self.is_origin() {
            return true;
        }
        readiness(&self.dependencies, status_of(self.id), status_of)
    }

    /// Apply the group-inherited enabled flag.
    ///
    /// The inherited value always wins over the definition's own `enabled`.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if let Some(declared) = self.declared_enabled {
            if declared != enabled {
                warn!(
                    task = %self.name,
                    declared,
                    inherited = enabled,
                    "task-level enabled flag is overridden by its group"
                );
            }
        }
        self.enabled = enabled;
    }

    pub(crate) fn set_dependencies(&mut self, dependencies: Vec<Dependency>) {
        self.dependencies = dependencies;
    }

    pub(crate) fn add_dependent(&mut self, dependent: TaskId) {
        if !self.dependents.contains(&dependent) {
            self.dependents.push(dependent);
        }
    }
}
