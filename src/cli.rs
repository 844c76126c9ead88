// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::dag::DagFormat;

/// Command-line arguments for `mycelium`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mycelium",
    version,
    about = "Run a project's task pipelines as a dependency-ordered DAG.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (YAML, TOML or JSON).
    ///
    /// Default: `mycelium.yaml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of workers; overrides `maxParallel` from the project file.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_parallel: Option<u16>,

    /// Load and build the DAG, print it, but don't execute any task.
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the dry-run DAG dump.
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    pub format: DagFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MYCELIUM_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
