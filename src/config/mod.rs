// src/config/mod.rs

//! Configuration loading and validation for mycelium.
//!
//! Responsibilities:
//! - Define the file-backed data model (`model.rs`).
//! - Load and merge the project's collection files (`loader.rs`).
//! - Fill task attributes from patterns (`patterns.rs`).
//! - Validate basic invariants like unique task names (`validate.rs`).

pub mod loader;
pub mod model;
pub mod patterns;
pub mod validate;

pub use loader::{load_and_validate, load_project, read_document};
pub use model::{
    DependsOn, GroupNode, PatternDefinition, PipelineNode, ProjectConfig, TaskDefinition,
};
pub use patterns::stitch_task_patterns;
pub use validate::validate_project;
