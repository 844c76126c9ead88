// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::engine::{Project, RunReport};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - DAG construction
/// - the worker pool run
/// - the per-task summary on stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)?;
    info!(project = %cfg.name, config = %config_path.display(), "project loaded");

    let project = Project::new(&cfg)?;

    if args.dry_run {
        println!("{}", project.view().render(args.format)?);
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let report = project
        .execute(args.max_parallel.map(usize::from))
        .await;
    print_summary(&report);

    if !report.started {
        bail!("project '{}' was not in a runnable state", report.project);
    }
    let failed = report.failed();
    if !failed.is_empty() {
        bail!("{} task(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

/// One line per task, in name order.
fn print_summary(report: &RunReport) {
    println!("mycelium run: {}", report.project);
    for (name, status) in &report.statuses {
        println!("  {name:<32} {status}");
    }
    println!(
        "executed {} task(s), {} failed",
        report.execution_order.len(),
        report.failed().len()
    );
}
