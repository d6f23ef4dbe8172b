//! # kata-publish
//!
//! Commits the record store to its git repository and pushes it upstream,
//! once per newly recorded challenge.
//!
//! Repository discovery goes through `gix`; the mutating steps (checkout,
//! pull, add, commit, push) shell out to the `git` CLI so that the user's
//! credential helpers and hooks apply. Every subprocess is bounded by a
//! timeout.

mod error;
mod git;
mod repo;

pub use error::PublishError;
pub use repo::{open_work_tree, store_pathspec};

use std::path::{Path, PathBuf};
use std::time::Duration;

use kata_core::ChallengeRecord;
use serde::Serialize;

/// What a publish attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishOutcome {
    /// A commit was created and pushed.
    Committed,
    /// The store file had no staged changes; nothing was committed or pushed.
    NothingToCommit,
}

/// Anything that can publish the store after a record was added.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn publish(&self, record: &ChallengeRecord) -> Result<PublishOutcome, PublishError>;
}

/// Commit message for `record`: `"{name} - {completedAt}"`, quoting the
/// timestamp exactly as stored.
#[must_use]
pub fn commit_message(record: &ChallengeRecord) -> String {
    format!("{} - {}", record.name, record.completed_at)
}

/// [`Publisher`] backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
    store_file: PathBuf,
    branch: String,
    remote: String,
    timeout: Duration,
}

impl GitPublisher {
    /// Publisher for `store_file` inside the repository at `repo_dir`,
    /// targeting `origin/main` with a 120 second limit per git command.
    pub fn new(repo_dir: impl Into<PathBuf>, store_file: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            store_file: store_file.into(),
            branch: "main".to_string(),
            remote: "origin".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<git::GitOutput, PublishError> {
        git::run_checked(dir, args, self.timeout).await
    }

    async fn has_staged_changes(&self, dir: &Path, store: &str) -> Result<bool, PublishError> {
        let args = ["diff", "--cached", "--quiet", "--", store];
        let output = git::run(dir, &args, self.timeout).await?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(PublishError::Git {
                command: format!("git {}", args.join(" ")),
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }
}

impl Publisher for GitPublisher {
    async fn publish(&self, record: &ChallengeRecord) -> Result<PublishOutcome, PublishError> {
        let work_tree = open_work_tree(&self.repo_dir)?;
        let store = store_pathspec(&work_tree, &self.store_file)?;
        let store = store.as_str();
        let branch = self.branch.as_str();
        let remote = self.remote.as_str();

        tracing::info!(
            challenge_id = %record.id,
            work_tree = %work_tree.display(),
            %remote,
            %branch,
            "publishing store"
        );

        self.git(&work_tree, &["checkout", branch]).await?;
        self.git(&work_tree, &["pull", remote, branch]).await?;
        self.git(&work_tree, &["add", "--", store]).await?;

        if !self.has_staged_changes(&work_tree, store).await? {
            tracing::info!(challenge_id = %record.id, "store unchanged, nothing to commit");
            return Ok(PublishOutcome::NothingToCommit);
        }

        let message = commit_message(record);
        self.git(&work_tree, &["commit", "-m", message.as_str()]).await?;
        self.git(&work_tree, &["push", remote, branch]).await?;

        tracing::info!(challenge_id = %record.id, %message, "committed and pushed");
        Ok(PublishOutcome::Committed)
    }
}
