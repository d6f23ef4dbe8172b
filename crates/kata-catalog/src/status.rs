//! Catalog refusals: HTTP status plus the catalog's own error body.
//!
//! The catalog answers an unknown user with `404` and
//! `{"success": false, "reason": "not found"}`. The `reason` is the useful
//! part, so it becomes the error message instead of the raw body.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::CatalogError;

/// Longest stretch of a non-catalog body quoted in an error.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Refusal {
    success: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Decide whether a fully read response is usable.
///
/// A `{"success": false}` body is a refusal even under a 2xx status.
pub fn check_reply(
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
) -> Result<(), CatalogError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CatalogError::RateLimited {
            retry_after_secs: retry_after.and_then(|v| v.trim().parse().ok()),
        });
    }

    let refusal = serde_json::from_str::<Refusal>(body)
        .ok()
        .filter(|r| !r.success);
    if status.is_success() && refusal.is_none() {
        return Ok(());
    }

    let message = match refusal.and_then(|r| r.reason) {
        Some(reason) => reason,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("empty response")
            .to_string(),
        None => excerpt(body),
    };
    Err(CatalogError::Api {
        status: status.as_u16(),
        message,
    })
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
