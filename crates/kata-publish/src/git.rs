//! Bounded `git` subprocesses.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::PublishError;

/// Exit status and captured stderr of one finished git command.
#[derive(Debug)]
pub struct GitOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// Run `git {args}` in `dir`, killing it if it outlives `timeout`.
///
/// A non-zero exit is not an error here; see [`run_checked`].
pub async fn run(dir: &Path, args: &[&str], timeout: Duration) -> Result<GitOutput, PublishError> {
    let command = display(args);
    tracing::debug!(%command, dir = %dir.display(), "running git");

    let child = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| PublishError::Timeout {
            command: command.clone(),
            timeout,
        })?
        .map_err(|source| PublishError::Spawn {
            command: command.clone(),
            source,
        })?;

    Ok(GitOutput {
        success: output.status.success(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Like [`run`], but a non-zero exit becomes [`PublishError::Git`].
pub async fn run_checked(
    dir: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<GitOutput, PublishError> {
    let output = run(dir, args, timeout).await?;
    if output.success {
        Ok(output)
    } else {
        Err(PublishError::Git {
            command: display(args),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

fn display(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}
