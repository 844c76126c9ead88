// src/config/model.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::{DependencyCondition, DependencyOperator};

/// Default worker pool size when neither the project nor a pipeline file
/// sets `maxParallel`.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Top-level project file (`mycelium.yaml` or `mycelium.toml`).
///
/// ```yaml
/// project:
///   name: demo
///   directory: ./
///   pipelines: [pipelines.yaml]
///   tasks: [tasks.yaml]
///   patterns: [patterns.yaml]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    pub project: ProjectSection,
}

/// `project` section of the project file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Project name; also the name of the origin task.
    pub name: String,

    /// Directory holding the collection files, relative to the project file.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Overrides any `maxParallel` found in the pipeline files.
    #[serde(default, rename = "maxParallel", alias = "max_parallel")]
    pub max_parallel: Option<usize>,

    #[serde(default)]
    pub pipelines: Vec<String>,

    #[serde(default)]
    pub tasks: Vec<String>,

    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_directory() -> String {
    "./".to_string()
}

/// A pipelines collection file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineFile {
    #[serde(default, rename = "maxParallel", alias = "max_parallel")]
    pub max_parallel: Option<usize>,

    #[serde(default)]
    pub pipelines: Vec<PipelineNode>,
}

/// A tasks collection file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

/// A patterns collection file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternFile {
    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,
}

/// One task definition as written in a tasks file.
///
/// Only `name` is interpreted here. Everything else (`type`, `enabled`,
/// `pattern` and the variant-specific fields) stays a flat attribute map so
/// that patterns can be merged in before the task is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, task_type: &str) -> Self {
        let mut attributes = Map::new();
        attributes.insert("type".to_string(), Value::String(task_type.to_string()));
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Set a single attribute, replacing any previous value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// The `type` tag, if present and a string.
    pub fn type_tag(&self) -> Option<&str> {
        self.attributes.get("type").and_then(Value::as_str)
    }

    /// The `pattern` reference, if present and a string.
    pub fn pattern(&self) -> Option<&str> {
        self.attributes.get("pattern").and_then(Value::as_str)
    }
}

/// A reusable set of task attributes referenced through `pattern: <name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A node of the pipeline tree: either a task name or a group of nodes.
///
/// A map is always read as a group, and errors inside it (a misspelled
/// condition, a non-boolean `enabled`) are reported as such. Any other value
/// is kept as `Invalid` so that the DAG builder can reject it with a
/// structured error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineNode {
    Task(String),
    Group(GroupNode),
    Invalid(Value),
}

impl<'de> Deserialize<'de> for PipelineNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = match Value::deserialize(deserializer)? {
            Value::String(name) => PipelineNode::Task(name),
            Value::Object(map) => {
                let group = GroupNode::deserialize(Value::Object(map))
                    .map_err(|e| serde::de::Error::custom(format!("invalid pipeline group: {e}")))?;
                PipelineNode::Group(group)
            }
            other => PipelineNode::Invalid(other),
        };
        Ok(node)
    }
}

impl PipelineNode {
    pub fn task(name: impl Into<String>) -> Self {
        PipelineNode::Task(name.into())
    }
}

/// A named group of pipeline nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(
        default,
        rename = "dependsOn",
        alias = "depends_on",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<DependsOn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub tasks: Vec<PipelineNode>,
}

/// One `dependsOn` entry of a group; `task` names a task or a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    pub task: String,

    #[serde(default)]
    pub condition: DependencyCondition,

    #[serde(default)]
    pub operator: DependencyOperator,
}

impl DependsOn {
    pub fn new(
        task: impl Into<String>,
        condition: DependencyCondition,
        operator: DependencyOperator,
    ) -> Self {
        Self {
            task: task.into(),
            condition,
            operator,
        }
    }
}

/// Fully merged project configuration handed to the DAG builder and the
/// orchestrator.
///
/// This is the only configuration input of the core; nothing below this
/// point reads files or environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    pub max_parallel: usize,
    pub tasks: Vec<TaskDefinition>,
    pub pipelines: Vec<PipelineNode>,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_parallel: DEFAULT_MAX_PARALLEL,
            tasks: Vec::new(),
            pipelines: Vec::new(),
        }
    }
}
