//! Local working copy and remote target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoConfig {
    /// Working copy holding `completed_kata.json`.
    #[serde(default)]
    pub local_path: PathBuf,

    /// Remote repository identifier (e.g. `owner/repo`). Informational only.
    #[serde(default)]
    pub remote_id: String,

    /// Branch that receives the commits.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Git remote name pulled from and pushed to.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            local_path: PathBuf::new(),
            remote_id: String::new(),
            branch: default_branch(),
            remote: default_remote(),
        }
    }
}

impl RepoConfig {
    pub fn is_configured(&self) -> bool {
        !self.local_path.as_os_str().is_empty()
    }

    /// The configured working copy path, or an error naming the missing field.
    pub fn require_local_path(&self) -> Result<&Path, ConfigError> {
        if self.is_configured() {
            Ok(&self.local_path)
        } else {
            Err(ConfigError::not_configured("repo", &["local_path"]))
        }
    }
}
