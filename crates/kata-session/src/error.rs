//! Session driver error types.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// No WebDriver session could be started.
    #[error("failed to start WebDriver session at {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Navigating to a page failed outright.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A waited-for element did not become visible in time.
    #[error("timed out after {}s waiting for '{selector}'", .timeout.as_secs())]
    NavigationTimeout { selector: String, timeout: Duration },

    /// An element the page was expected to contain is absent.
    #[error("no element matches '{selector}'")]
    MissingElement { selector: String },

    /// Any other WebDriver command failure.
    #[error("webdriver error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

impl SessionError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::NavigationTimeout { .. })
    }
}
