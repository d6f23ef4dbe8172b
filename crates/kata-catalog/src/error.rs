//! Catalog error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when reading the completed-challenge catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (DNS, TLS, connection reset, ...).
    #[error("catalog unavailable: {0}")]
    RemoteUnavailable(#[source] reqwest::Error),

    /// The request did not finish within the configured timeout.
    #[error("catalog request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The catalog refused the lookup.
    #[error("catalog API error ({status}): {message}")]
    Api {
        status: u16,
        /// The catalog's `reason`, or an excerpt of whatever body came back.
        message: String,
    },

    /// 429 Too Many Requests.
    #[error(
        "catalog rate limited the request{}",
        .retry_after_secs.map(|s| format!(", retry after {s}s")).unwrap_or_default()
    )]
    RateLimited {
        /// `Retry-After` in seconds, when the header held a plain number.
        retry_after_secs: Option<u64>,
    },

    /// The response body does not have the expected shape.
    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),

    /// The client could not be constructed.
    #[error("invalid catalog client setup: {0}")]
    Setup(String),
}

impl CatalogError {
    /// Whether the remote could not be reached or refused the request, as
    /// opposed to answering with something unparseable.
    #[must_use]
    pub const fn is_remote_unavailable(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable(_)
                | Self::Timeout(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
        )
    }

    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::RemoteUnavailable(error)
        }
    }
}
