use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mycelium::dag::Task;
use mycelium::engine::TaskOutcome;
use mycelium::exec::{ExecuteFuture, TaskExecutor};
use tokio::sync::Barrier;

/// A fake executor that:
/// - records which tasks were "run", in start order
/// - returns scripted outcomes (success unless told otherwise)
/// - can panic, sleep, or wait on a barrier for chosen tasks
#[derive(Default)]
pub struct RecordingExecutor {
    executed: Mutex<Vec<String>>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    delays: HashMap<String, Duration>,
    barriers: HashMap<String, Arc<Barrier>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `task` reports `Failed(1)`.
    pub fn fail(mut self, task: &str) -> Self {
        self.failures.insert(task.to_string());
        self
    }

    /// `task` panics inside the executor.
    pub fn panic_on(mut self, task: &str) -> Self {
        self.panics.insert(task.to_string());
        self
    }

    /// `task` sleeps before completing.
    pub fn delay(mut self, task: &str, duration: Duration) -> Self {
        self.delays.insert(task.to_string(), duration);
        self
    }

    /// `task` waits on `barrier` before completing.
    pub fn barrier(mut self, task: &str, barrier: Arc<Barrier>) -> Self {
        self.barriers.insert(task.to_string(), barrier);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Names of executed tasks, origin excluded.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn count(&self, task: &str) -> usize {
        self.executed().iter().filter(|t| *t == task).count()
    }
}

impl TaskExecutor for RecordingExecutor {
    fn execute<'a>(&'a self, task: &'a Task) -> ExecuteFuture<'a> {
        Box::pin(async move {
            let name = task.name().to_string();
            if !task.is_origin() {
                self.executed.lock().unwrap().push(name.clone());
            }

            if let Some(barrier) = self.barriers.get(&name) {
                barrier.wait().await;
            }
            if let Some(delay) = self.delays.get(&name) {
                tokio::time::sleep(*delay).await;
            }
            if self.panics.contains(&name) {
                panic!("scripted panic in task '{name}'");
            }

            if self.failures.contains(&name) {
                Ok(TaskOutcome::Failed(1))
            } else {
                Ok(TaskOutcome::Success)
            }
        })
    }
}
