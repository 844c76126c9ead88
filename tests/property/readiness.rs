// tests/property/readiness.rs

use proptest::prelude::*;
use mycelium::dag::{Dependency, TaskId, dependencies_satisfied, readiness};
use mycelium::types::{DependencyCondition, DependencyOperator, TaskStatus};

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::None),
        Just(TaskStatus::Queued),
        Just(TaskStatus::Executing),
        Just(TaskStatus::Succeeded),
        Just(TaskStatus::Failed),
    ]
}

fn condition_strategy() -> impl Strategy<Value = DependencyCondition> {
    prop_oneof![
        Just(DependencyCondition::Success),
        Just(DependencyCondition::Failure),
        Just(DependencyCondition::Completion),
    ]
}

/// One edge per entry, each pointing at its own target whose status is
/// given alongside.
fn edges(
    operator: DependencyOperator,
    offset: usize,
) -> impl Strategy<Value = Vec<(Dependency, TaskStatus)>> {
    proptest::collection::vec((condition_strategy(), status_strategy()), 0..=5).prop_map(
        move |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (condition, status))| {
                    let target = TaskId::from_index(offset + i);
                    (Dependency::new(target, condition, operator), status)
                })
                .collect()
        },
    )
}

fn satisfied(condition: DependencyCondition, status: TaskStatus) -> bool {
    match condition {
        DependencyCondition::Success => status == TaskStatus::Succeeded,
        DependencyCondition::Failure => status == TaskStatus::Failed,
        DependencyCondition::Completion => status.is_terminal(),
    }
}

proptest! {
    #[test]
    fn and_group_needs_all_or_group_needs_one(
        ands in edges(DependencyOperator::And, 0),
        ors in edges(DependencyOperator::Or, 100),
    ) {
        let statuses: Vec<(TaskId, TaskStatus)> = ands
            .iter()
            .chain(ors.iter())
            .map(|(d, s)| (d.target(), *s))
            .collect();
        let status_of = |id: TaskId| {
            statuses
                .iter()
                .find(|(t, _)| *t == id)
                .map(|(_, s)| *s)
                .unwrap_or(TaskStatus::None)
        };

        let all: Vec<Dependency> = ands.iter().chain(ors.iter()).map(|(d, _)| *d).collect();

        let all_and = ands.iter().all(|(d, s)| satisfied(d.condition(), *s));
        let any_or = ors.is_empty() || ors.iter().any(|(d, s)| satisfied(d.condition(), *s));

        prop_assert_eq!(dependencies_satisfied(&all, status_of), all_and && any_or);
    }

    #[test]
    fn only_queued_tasks_can_be_ready(
        ands in edges(DependencyOperator::And, 0),
        own in status_strategy(),
    ) {
        let all: Vec<Dependency> = ands.iter().map(|(d, _)| *d).collect();
        let status_of = |id: TaskId| ands[id.index()].1;

        let ready = readiness(&all, own, status_of);
        if own != TaskStatus::Queued {
            prop_assert!(!ready);
        } else {
            prop_assert_eq!(ready, dependencies_satisfied(&all, status_of));
        }
    }

    #[test]
    fn edge_order_does_not_matter(
        mut ands in edges(DependencyOperator::And, 0),
        mut ors in edges(DependencyOperator::Or, 100),
    ) {
        let statuses: Vec<(TaskId, TaskStatus)> = ands
            .iter()
            .chain(ors.iter())
            .map(|(d, s)| (d.target(), *s))
            .collect();
        let status_of = |id: TaskId| {
            statuses
                .iter()
                .find(|(t, _)| *t == id)
                .map(|(_, s)| *s)
                .unwrap_or(TaskStatus::None)
        };

        let forward: Vec<Dependency> = ands.iter().chain(ors.iter()).map(|(d, _)| *d).collect();
        ands.reverse();
        ors.reverse();
        let backward: Vec<Dependency> = ors.iter().chain(ands.iter()).map(|(d, _)| *d).collect();

        prop_assert_eq!(
            dependencies_satisfied(&forward, status_of),
            dependencies_satisfied(&backward, status_of)
        );
    }
}
