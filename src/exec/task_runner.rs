// src/exec/task_runner.rs

//! Local process runner for `command` tasks.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::dag::CommandTask;
use crate::engine::TaskOutcome;

/// Run a command task to completion and map its exit status.
///
/// stdout and stderr are drained line by line into `debug` logs so the
/// pipes never fill up. When the task sets a `timeout`, a process still
/// running after that many seconds is killed and reported as failed.
pub async fn run_command(task: &str, spec: &CommandTask) -> Result<TaskOutcome> {
    info!(task = %task, cmd = %spec.cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&spec.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task))?;

    if let Some(stdout) = child.stdout.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stdout: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let status = match spec.timeout {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!(task = %task, timeout_secs = secs, "task timed out; killing process");
                if let Err(e) = child.kill().await {
                    warn!(task = %task, error = %e, "failed to kill timed out process");
                }
                return Ok(TaskOutcome::Failed(-1));
            }
        },
        None => child.wait().await,
    }
    .with_context(|| format!("waiting for process of task '{}'", task))?;

    let code = status.code().unwrap_or(-1);
    info!(
        task = %task,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if status.success() {
        Ok(TaskOutcome::Success)
    } else {
        Ok(TaskOutcome::Failed(code))
    }
}
