// src/config/patterns.rs

//! Pattern stitching for task definitions.
//!
//! Many tasks share the same attributes. A pattern is a named attribute set
//! and a task opts in with `pattern: <name>`. Attributes the task sets itself
//! win; the task may therefore use a pattern partially.

use tracing::debug;

use crate::config::model::{PatternDefinition, TaskDefinition};
use crate::errors::{MyceliumError, Result};

const PATTERN_KEY: &str = "pattern";

/// Fill missing task attributes from the pattern each task references.
///
/// Pattern names match case-insensitively. The `pattern` key is removed from
/// every task that had one.
pub fn stitch_task_patterns(
    tasks: &mut [TaskDefinition],
    patterns: &[PatternDefinition],
) -> Result<()> {
    for task in tasks.iter_mut() {
        let Some(pattern_name) = task.pattern().map(str::to_string) else {
            continue;
        };

        let pattern = find_pattern(patterns, &pattern_name).ok_or_else(|| {
            MyceliumError::PatternNotFound {
                task: task.name.clone(),
                pattern: pattern_name.clone(),
            }
        })?;

        for (key, value) in pattern.attributes.iter() {
            if !task.attributes.contains_key(key) {
                task.attributes.insert(key.clone(), value.clone());
            }
        }
        task.attributes.remove(PATTERN_KEY);

        debug!(task = %task.name, pattern = %pattern.name, "applied task pattern");
    }

    Ok(())
}

fn find_pattern<'a>(patterns: &'a [PatternDefinition], name: &str) -> Option<&'a PatternDefinition> {
    patterns
        .iter()
        .find(|p| p.name.to_lowercase() == name.to_lowercase())
}
