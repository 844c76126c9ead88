// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Build-time failures (config loading, DAG construction) are fatal and
//! surface as one of the structured variants below. Failures inside a task's
//! execution never reach this type; the scheduler records them as
//! [`TaskStatus::Failed`](crate::types::TaskStatus::Failed) instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MyceliumError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task {0} is not found in the task definitions")]
    TaskNotFound(String),

    #[error("Duplicate task definition: {0}")]
    DuplicateTask(String),

    #[error("Task {0} is referenced more than once in the pipelines")]
    DuplicateTaskReference(String),

    #[error("Group or task '{dependency}' referenced in dependsOn of '{group}' does not exist")]
    UnknownDependency { group: String, dependency: String },

    #[error("Task '{task}' has unknown type '{tag}'")]
    UnknownTaskType { task: String, tag: String },

    #[error("Malformed pipeline: {0}")]
    MalformedPipeline(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("Pattern '{pattern}' used by task '{task}' is not defined")]
    PatternNotFound { task: String, pattern: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MyceliumError>;
