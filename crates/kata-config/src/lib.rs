//! # kata-config
//!
//! Layered configuration loading for kata-sync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KATA_SYNC_*` prefix, `__` as separator)
//! 2. Legacy environment names (`CODEWARS_USERNAME`, `CODEWARS_PASSWORD`,
//!    `LOCAL_REPO_PATH`, `GITHUB_REPO`)
//! 3. Working-directory `kata-sync.toml`
//! 4. User-level `~/.config/kata-sync/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KATA_SYNC_BROWSER__WEBDRIVER_URL` -> `browser.webdriver_url`,
//! `KATA_SYNC_REPO__BRANCH` -> `repo.branch`, etc.
//!
//! Figment parses environment values, so `0123` would become the integer
//! `123`. Credentials, paths and repository names are read verbatim instead
//! (see [`VERBATIM_KEYS`]).
//!
//! # Usage
//!
//! ```no_run
//! use kata_config::SyncConfig;
//!
//! let config = SyncConfig::load().expect("config");
//! if config.account.is_configured() {
//!     println!("signing in as {}", config.account.username);
//! }
//! ```

mod account;
mod api;
mod browser;
mod error;
mod git;
mod repo;

pub use account::AccountConfig;
pub use api::ApiConfig;
pub use browser::{BrowserConfig, SelectorConfig};
pub use error::ConfigError;
pub use git::GitConfig;
pub use repo::RepoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the working-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "kata-sync.toml";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "KATA_SYNC_";

/// Legacy environment names and the keys they feed.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("CODEWARS_USERNAME", "account.username"),
    ("CODEWARS_PASSWORD", "account.password"),
    ("LOCAL_REPO_PATH", "repo.local_path"),
    ("GITHUB_REPO", "repo.remote_id"),
];

/// String keys whose environment values are taken as-is, never parsed.
pub const VERBATIM_KEYS: [&str; 7] = [
    "account.username",
    "account.password",
    "api.user",
    "repo.local_path",
    "repo.remote_id",
    "repo.branch",
    "repo.remote",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub repo: RepoConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub git: GitConfig,
}

impl SyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; the binary does that before calling in.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::merge_verbatim_env(figment)
    }

    /// Profile name used for catalog lookups.
    pub fn api_user(&self) -> &str {
        if self.api.user.is_empty() {
            &self.account.username
        } else {
            &self.api.user
        }
    }

    /// Check everything a full sync run needs.
    pub fn validate_for_sync(&self) -> Result<(), ConfigError> {
        self.account.require()?;
        self.repo.require_local_path()?;
        self.validate_for_catalog()
    }

    /// Check what a catalog lookup needs.
    pub fn validate_for_catalog(&self) -> Result<(), ConfigError> {
        if self.api_user().is_empty() {
            return Err(ConfigError::not_configured("api", &["user"]));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.api.base_url),
            });
        }
        Ok(())
    }

    /// Re-merge string keys from the raw environment.
    ///
    /// The prefixed name wins over the legacy one.
    fn merge_verbatim_env(mut figment: Figment) -> Figment {
        for key in VERBATIM_KEYS {
            let legacy = LEGACY_ENV
                .iter()
                .find(|(_, target)| *target == key)
                .and_then(|(name, _)| Env::var(name));
            if let Some(value) = Env::var(&prefixed_env_name(key)).or(legacy) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kata-sync").join("config.toml"))
    }
}

/// `repo.remote_id` -> `KATA_SYNC_REPO__REMOTE_ID`.
fn prefixed_env_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "__").to_ascii_uppercase())
}
