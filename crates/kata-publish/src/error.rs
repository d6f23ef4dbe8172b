use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("not a git work tree: {}", .0.display())]
    NotAVersionControlDirectory(PathBuf),
    #[error("store {} is outside the work tree {}", .store.display(), .work_tree.display())]
    StoreOutsideWorkTree { store: PathBuf, work_tree: PathBuf },
    #[error("cannot resolve {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error("`{command}` did not finish within {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    /// The repository is absent; nothing was attempted.
    #[must_use]
    pub const fn is_not_a_repository(&self) -> bool {
        matches!(self, Self::NotAVersionControlDirectory(_))
    }
}
