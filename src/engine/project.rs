// src/engine/project.rs

//! Project: the DAG of one configuration plus its run state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::dag::{Dag, DagView, build_dag};
use crate::errors::Result;
use crate::exec::{LocalExecutor, TaskExecutor};

use super::RunReport;
use super::scheduler::Scheduler;

#[derive(Debug)]
pub struct Project {
    name: String,
    max_parallel: usize,
    scheduler: Scheduler,
}

impl Project {
    /// Build the DAG for `config` and attach the default executor.
    pub fn new(config: &ProjectConfig) -> Result<Self> {
        Self::with_executor(config, Arc::new(LocalExecutor::new()))
    }

    pub fn with_executor(config: &ProjectConfig, executor: Arc<dyn TaskExecutor>) -> Result<Self> {
        let dag = build_dag(config)?;
        info!(project = %config.name, tasks = dag.len(), "project DAG built");

        Ok(Self {
            name: config.name.clone(),
            max_parallel: config.max_parallel,
            scheduler: Scheduler::new(dag, executor),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn dag(&self) -> &Dag {
        self.scheduler.dag()
    }

    pub fn view(&self) -> DagView {
        self.scheduler.view()
    }

    /// A project can run only while every task is still `NONE`.
    pub fn is_ready(&self) -> bool {
        self.scheduler.is_pristine()
    }

    /// Run the DAG to quiescence with `max_parallel` workers, falling back
    /// to the configured pool size.
    ///
    /// A project that has already run is left untouched and the report says
    /// it was not started.
    pub async fn execute(&self, max_parallel: Option<usize>) -> RunReport {
        let pool_size = max_parallel.unwrap_or(self.max_parallel);
        if !self.scheduler.execute(pool_size).await {
            warn!(project = %self.name, "project is not in a runnable state; not starting");
            return RunReport::not_started(self);
        }

        RunReport::from_board(self.dag(), &self.scheduler.board())
    }
}
