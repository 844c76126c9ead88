// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::ProjectConfig;
use crate::errors::{MyceliumError, Result};

/// Run semantic validation against a merged project configuration.
///
/// This checks:
/// - there is at least one task definition
/// - `max_parallel >= 1`
/// - task names are unique and do not collide with the project name, which
///   is reserved for the origin task
///
/// It does **not** resolve pipeline references or detect cycles; both need
/// the linked graph and are done by the DAG builder.
pub fn validate_project(cfg: &ProjectConfig) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_max_parallel(cfg)?;
    validate_task_names(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &ProjectConfig) -> Result<()> {
    if cfg.tasks.is_empty() {
        return Err(MyceliumError::ConfigError(format!(
            "project '{}' must define at least one task",
            cfg.name
        )));
    }
    Ok(())
}

fn validate_max_parallel(cfg: &ProjectConfig) -> Result<()> {
    if cfg.max_parallel == 0 {
        return Err(MyceliumError::ConfigError(
            "maxParallel must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Task names are the graph keys, so they must be unique.
pub fn validate_task_names(cfg: &ProjectConfig) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for task in cfg.tasks.iter() {
        if task.name == cfg.name {
            return Err(MyceliumError::ConfigError(format!(
                "task '{}' uses the project name, which is reserved for the origin task",
                task.name
            )));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(MyceliumError::DuplicateTask(task.name.clone()));
        }
    }
    Ok(())
}
