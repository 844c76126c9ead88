// src/dag/mod.rs

//! DAG representation and construction.
//!
//! - [`task`] holds the task entity, its variants and the variant factory.
//! - [`dependency`] holds dependency edges and the readiness predicate.
//! - [`builder`] expands the pipeline/group tree into a linked graph.
//! - [`graph`] is the arena that owns every task of a project.
//! - [`view`] renders a serializable snapshot of the graph.

pub mod builder;
pub mod dependency;
pub mod graph;
pub mod task;
pub mod view;

pub use builder::build_dag;
pub use dependency::{Dependency, dependencies_satisfied, readiness};
pub use graph::Dag;
pub use task::{CommandTask, LibraryTask, NotebookTask, Task, TaskId, TaskKind};
pub use view::{DagFormat, DagView, DependencyView, TaskView};
