//! Catalog API configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://www.codewars.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Site root; the completed-challenges endpoint is built beneath it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public profile name whose completed challenges are listed. Falls back
    /// to `account.username` when empty.
    #[serde(default)]
    pub user: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Walk every page the API reports instead of only page 0.
    #[serde(default)]
    pub all_pages: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: String::new(),
            timeout_secs: default_timeout_secs(),
            all_pages: false,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
