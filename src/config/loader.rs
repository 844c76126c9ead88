// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::model::{
    DEFAULT_MAX_PARALLEL, PatternFile, PipelineFile, ProjectConfig, ProjectFile, TaskFile,
};
use crate::config::patterns::stitch_task_patterns;
use crate::config::validate::validate_project;
use crate::errors::Result;

/// Read a single YAML, TOML or JSON document, picking the parser from the
/// file extension. Unknown extensions are parsed as YAML.
pub fn read_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let doc: T = match extension.as_deref() {
        Some("toml") => toml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        _ => serde_yaml::from_str(&contents)?,
    };
    Ok(doc)
}

/// Load a project file and every collection file it lists, and merge them
/// into a single [`ProjectConfig`].
///
/// This only performs loading and merging. Use [`load_and_validate`] to also
/// run the semantic checks.
pub fn load_project(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading mycelium project");

    let project: ProjectFile = read_document(path)?;
    let section = project.project;
    let directory = config_root_dir(path).join(&section.directory);

    let mut max_parallel = section.max_parallel;
    let mut pipelines = Vec::new();
    for file in section.pipelines.iter() {
        let file_path = directory.join(file);
        info!(path = %file_path.display(), "loading pipelines");
        let loaded: PipelineFile = read_document(&file_path)?;
        if max_parallel.is_none() {
            max_parallel = loaded.max_parallel;
        }
        pipelines.extend(loaded.pipelines);
    }

    let mut tasks = Vec::new();
    for file in section.tasks.iter() {
        let file_path = directory.join(file);
        info!(path = %file_path.display(), "loading tasks");
        let loaded: TaskFile = read_document(&file_path)?;
        tasks.extend(loaded.tasks);
    }

    let mut patterns = Vec::new();
    for file in section.patterns.iter() {
        let file_path = directory.join(file);
        info!(path = %file_path.display(), "loading patterns");
        let loaded: PatternFile = read_document(&file_path)?;
        patterns.extend(loaded.patterns);
    }

    stitch_task_patterns(&mut tasks, &patterns)?;

    Ok(ProjectConfig {
        name: section.name,
        max_parallel: max_parallel.unwrap_or(DEFAULT_MAX_PARALLEL),
        tasks,
        pipelines,
    })
}

/// Load a project and run [`validate_project`] on the result.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let config = load_project(path)?;
    validate_project(&config)?;
    Ok(config)
}

/// Default project file location: `mycelium.yaml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("mycelium.yaml")
}

/// Directory that relative collection paths are resolved against.
///
/// A bare file name such as `mycelium.yaml` has an empty parent, which
/// resolves to the current directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
