//! # kata-catalog
//!
//! HTTP client for the public catalog of completed challenges.
//!
//! Reads `GET {base}/api/v1/users/{user}/code-challenges/completed?page=N`
//! and maps the `data` array onto [`ChallengeRecord`]s. Only page 0 is read
//! unless the client is built with [`CatalogClient::with_all_pages`].

mod completed;
mod error;
mod status;

pub use completed::{CompletedPage, parse_completed_page};
pub use error::CatalogError;

use std::time::Duration;

use kata_core::ChallengeRecord;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the user's completed challenges.
///
/// Implemented by [`CatalogClient`]; the sync pipeline is generic over it.
#[allow(async_fn_in_trait)]
pub trait ChallengeDirectory {
    /// Completed-challenge records in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog is unreachable, answers with
    /// a non-success status, or returns a body of the wrong shape.
    async fn fetch_completed(&self) -> Result<Vec<ChallengeRecord>, CatalogError>;
}

/// HTTP client for the completed-challenges endpoint.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    all_pages: bool,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a client with the default 30 s request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Setup`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(base_url: &str, user: &str) -> Result<Self, CatalogError> {
        Self::with_timeout(base_url, user, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Setup`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn with_timeout(
        base_url: &str,
        user: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kata-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            user: user.to_string(),
            all_pages: false,
            timeout,
        })
    }

    /// Walk every page reported by `totalPages` instead of only page 0.
    #[must_use]
    pub const fn with_all_pages(mut self, all_pages: bool) -> Self {
        self.all_pages = all_pages;
        self
    }
}

impl ChallengeDirectory for CatalogClient {
    async fn fetch_completed(&self) -> Result<Vec<ChallengeRecord>, CatalogError> {
        self.fetch_records().await
    }
}
