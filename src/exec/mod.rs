// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`backend`] provides the `TaskExecutor` trait the workers call, and the
//!   `LocalExecutor` used in production, which tests can replace with a
//!   fake implementation.
//! - [`task_runner`] runs `command` tasks as local processes using
//!   `tokio::process::Command`.

pub mod backend;
pub mod task_runner;

pub use backend::{ExecuteFuture, LocalExecutor, TaskExecutor};
pub use task_runner::run_command;
