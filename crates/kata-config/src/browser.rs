//! WebDriver session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_site_url() -> String {
    "https://www.codewars.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/123.0.0.0 Safari/537.36"
        .to_string()
}

const fn default_wait_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver listens on 9515 by default).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Site root for the sign-in and solution pages.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub headless: bool,

    /// Upper bound for every page wait, in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Abort the run when sign-in cannot be confirmed.
    #[serde(default)]
    pub require_login: bool,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            site_url: default_site_url(),
            user_agent: default_user_agent(),
            headless: false,
            wait_timeout_secs: default_wait_timeout_secs(),
            require_login: false,
            selectors: SelectorConfig::default(),
        }
    }
}

impl BrowserConfig {
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

fn default_toggle() -> String {
    "sl-details#kata-details-description span[slot='summary']".to_string()
}

fn default_code() -> String {
    "div.js-result-group pre".to_string()
}

fn default_description() -> String {
    "sl-details#kata-details-description div#description p".to_string()
}

/// CSS selectors on the solutions page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectorConfig {
    /// Expands the collapsed kata description.
    #[serde(default = "default_toggle")]
    pub toggle: String,

    #[serde(default = "default_code")]
    pub code: String,

    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle(),
            code: default_code(),
            description: default_description(),
        }
    }
}
