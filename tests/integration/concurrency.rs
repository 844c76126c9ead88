// tests/integration/concurrency.rs

use std::sync::Arc;
use std::time::Duration;

use mycelium::engine::Project;
use mycelium::types::{DependencyCondition, DependencyOperator, TaskStatus};
use mycelium_test_utils::{GroupBuilder, ProjectBuilder, RecordingExecutor, init_tracing, with_timeout};
use tokio::sync::Barrier;

/// `join` depends on every `p{i}` with SUCCESS/OR, so each finishing
/// predecessor offers it to the queue again.
fn fan_in(width: usize) -> ProjectBuilder {
    let mut builder = ProjectBuilder::new("fan").notebook("join");
    let mut group = GroupBuilder::new("joining").task("join");
    for i in 0..width {
        let name = format!("p{i}");
        builder = builder.notebook(&name).task(&name);
        group = group.depends_on(&name, DependencyCondition::Success, DependencyOperator::Or);
    }
    builder.group(group)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn or_join_executes_exactly_once_under_contention() {
    init_tracing();
    let width = 4;

    // Hold every predecessor until all of them are in flight, so they finish
    // (and propagate) as close together as possible.
    let barrier = Arc::new(Barrier::new(width));
    let mut executor = RecordingExecutor::new();
    for i in 0..width {
        executor = executor.barrier(&format!("p{i}"), Arc::clone(&barrier));
    }
    let executor = executor.into_shared();

    let config = fan_in(width).max_parallel(width + 1).build();
    let project = Project::with_executor(&config, executor.clone()).unwrap();
    let report = with_timeout(project.execute(None)).await;

    assert_eq!(executor.count("join"), 1);
    assert_eq!(report.status("join"), Some(TaskStatus::Succeeded));
    for i in 0..width {
        assert_eq!(executor.count(&format!("p{i}")), 1);
    }
    assert_eq!(report.execution_order.len(), width + 1);
    assert_eq!(report.execution_order.last().map(String::as_str), Some("join"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_runs_never_duplicate_work() {
    init_tracing();
    for _ in 0..20 {
        let executor = RecordingExecutor::new().into_shared();
        let config = fan_in(6).max_parallel(8).build();
        let project = Project::with_executor(&config, executor.clone()).unwrap();
        let report = with_timeout(project.execute(None)).await;

        assert!(report.is_success());
        assert_eq!(executor.executed().len(), 7);
        assert_eq!(executor.count("join"), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_runs_independent_tasks_in_parallel() {
    init_tracing();
    let width = 4;

    // Deadlocks (and times out) unless all four run at the same time.
    let barrier = Arc::new(Barrier::new(width));
    let mut executor = RecordingExecutor::new();
    let mut builder = ProjectBuilder::new("wide").max_parallel(width);
    for i in 0..width {
        let name = format!("t{i}");
        builder = builder.notebook(&name).task(&name);
        executor = executor.barrier(&name, Arc::clone(&barrier));
    }
    let executor = executor.into_shared();

    let project = Project::with_executor(&builder.build(), executor.clone()).unwrap();
    let report = with_timeout(project.execute(None)).await;

    assert!(report.is_success());
    assert_eq!(executor.executed().len(), width);
}

#[tokio::test]
async fn single_worker_drains_the_whole_graph() {
    init_tracing();
    let executor = RecordingExecutor::new()
        .delay("p0", Duration::from_millis(20))
        .into_shared();

    let config = fan_in(3).max_parallel(1).build();
    let project = Project::with_executor(&config, executor.clone()).unwrap();
    let report = with_timeout(project.execute(None)).await;

    assert!(report.is_success());
    assert_eq!(executor.executed().len(), 4);
    assert_eq!(executor.executed().last().map(String::as_str), Some("join"));
}

#[tokio::test]
async fn explicit_pool_size_overrides_configuration() {
    init_tracing();
    let width = 3;
    let barrier = Arc::new(Barrier::new(width));
    let mut executor = RecordingExecutor::new();
    let mut builder = ProjectBuilder::new("override").max_parallel(1);
    for i in 0..width {
        let name = format!("t{i}");
        builder = builder.notebook(&name).task(&name);
        executor = executor.barrier(&name, Arc::clone(&barrier));
    }
    let executor = executor.into_shared();

    let project = Project::with_executor(&builder.build(), executor.clone()).unwrap();
    let report = with_timeout(project.execute(Some(width))).await;

    assert!(report.is_success());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_executes_start_only_one_run() {
    init_tracing();
    let executor = RecordingExecutor::new()
        .delay("p0", Duration::from_millis(20))
        .into_shared();
    let project = Arc::new(Project::with_executor(&fan_in(3).build(), executor.clone()).unwrap());

    let callers = 4;
    let barrier = Arc::new(Barrier::new(callers));
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let project = Arc::clone(&project);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                project.execute(None).await
            })
        })
        .collect();

    let mut started = 0;
    for handle in handles {
        let report = with_timeout(handle).await.unwrap();
        if report.started {
            started += 1;
        }
    }

    assert_eq!(started, 1);
    assert_eq!(executor.executed().len(), 4);
    assert_eq!(executor.count("join"), 1);
}
