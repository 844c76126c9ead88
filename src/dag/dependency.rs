// src/dag/dependency.rs

//! Dependency edges and the readiness predicate.

use crate::dag::task::TaskId;
use crate::types::{DependencyCondition, DependencyOperator, TaskStatus};

/// A typed edge from a dependent task to one of its prerequisites.
///
/// Edges are created once by the DAG builder and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    target: TaskId,
    condition: DependencyCondition,
    operator: DependencyOperator,
}

impl Dependency {
    pub fn new(
        target: TaskId,
        condition: DependencyCondition,
        operator: DependencyOperator,
    ) -> Self {
        Self {
            target,
            condition,
            operator,
        }
    }

    /// The edge every unanchored task gets: origin, `COMPLETION`, `OR`.
    pub fn on_origin(origin: TaskId) -> Self {
        Self::new(origin, DependencyCondition::Completion, DependencyOperator::Or)
    }

    pub fn target(&self) -> TaskId {
        self.target
    }

    pub fn condition(&self) -> DependencyCondition {
        self.condition
    }

    pub fn operator(&self) -> DependencyOperator {
        self.operator
    }

    /// Whether the prerequisite, currently in `target_status`, satisfies
    /// this edge.
    pub fn is_satisfied(&self, target_status: TaskStatus) -> bool {
        match (target_status, self.condition) {
            (TaskStatus::Succeeded, DependencyCondition::Completion)
            | (TaskStatus::Succeeded, DependencyCondition::Success)
            | (TaskStatus::Failed, DependencyCondition::Completion)
            | (TaskStatus::Failed, DependencyCondition::Failure) => true,
            _ => false,
        }
    }
}

/// Evaluate a set of sibling edges.
///
/// AND edges must all be satisfied and at least one OR edge must be, where an
/// empty group places no constraint.
pub fn dependencies_satisfied<F>(dependencies: &[Dependency], status_of: F) -> bool
where
    F: Fn(TaskId) -> TaskStatus,
{
    let mut all_and = true;
    let mut has_or = false;
    let mut any_or = false;

    for dep in dependencies {
        let satisfied = dep.is_satisfied(status_of(dep.target));
        match dep.operator {
            DependencyOperator::And => all_and &= satisfied,
            DependencyOperator::Or => {
                has_or = true;
                any_or |= satisfied;
            }
        }
    }

    all_and && (!has_or || any_or)
}

/// Task-level readiness for a non-origin task.
///
/// Requiring `QUEUED` is what makes a task claimable only once: the claim
/// moves it to `EXECUTING` under the project lock, so later deliveries of
/// the same task see it as not ready and are dropped.
pub fn readiness<F>(dependencies: &[Dependency], own_status: TaskStatus, status_of: F) -> bool
where
    F: Fn(TaskId) -> TaskStatus,
{
    own_status == TaskStatus::Queued && dependencies_satisfied(dependencies, status_of)
}
