// src/types.rs

//! Small enums shared by the config, DAG and engine layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
///
/// Variants are declared in lifecycle order so that comparisons such as
/// `status >= TaskStatus::Succeeded` read as "has reached a terminal state".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    #[default]
    None,
    Queued,
    Executing,
    Succeeded,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        self >= TaskStatus::Succeeded
    }

    /// True until a worker has claimed the task for execution.
    pub fn is_unclaimed(self) -> bool {
        self < TaskStatus::Executing
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::None => "NONE",
            TaskStatus::Queued => "QUEUED",
            TaskStatus::Executing => "EXECUTING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Which terminal status of a prerequisite satisfies a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum DependencyCondition {
    Success,
    Failure,
    #[default]
    Completion,
}

impl FromStr for DependencyCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(DependencyCondition::Success),
            "failure" => Ok(DependencyCondition::Failure),
            "completion" => Ok(DependencyCondition::Completion),
            other => Err(format!(
                "invalid dependency condition: {other} (expected \"success\", \"failure\" or \"completion\")"
            )),
        }
    }
}

impl TryFrom<String> for DependencyCondition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How a dependency edge combines with its siblings on the same dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum DependencyOperator {
    And,
    #[default]
    Or,
}

impl FromStr for DependencyOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(DependencyOperator::And),
            "or" => Ok(DependencyOperator::Or),
            other => Err(format!(
                "invalid dependency operator: {other} (expected \"and\" or \"or\")"
            )),
        }
    }
}

impl TryFrom<String> for DependencyOperator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
