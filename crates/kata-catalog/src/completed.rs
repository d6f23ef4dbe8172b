//! Completed-challenges endpoint: URL construction and response parsing.

use kata_core::ChallengeRecord;
use serde::Deserialize;

use crate::{CatalogClient, error::CatalogError, status::check_reply};

/// One page of the completed-challenges listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPage {
    /// Total number of pages the API reports. Absent on some responses.
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_items: Option<u32>,
    pub data: Vec<ChallengeRecord>,
}

/// Parse a completed-challenges response body.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedResponse`] when the body is not JSON or
/// lacks a `data` array of records.
pub fn parse_completed_page(body: &str) -> Result<CompletedPage, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::MalformedResponse(e.to_string()))
}

impl CatalogClient {
    /// URL of one page of the configured user's completed challenges.
    #[must_use]
    pub fn completed_url(&self, page: u32) -> String {
        format!(
            "{}/api/v1/users/{}/code-challenges/completed?page={page}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.user)
        )
    }

    /// Fetch and parse a single page.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the request fails, the catalog refuses it,
    /// or the body cannot be parsed.
    pub async fn fetch_page(&self, page: u32) -> Result<CompletedPage, CatalogError> {
        let url = self.completed_url(page);
        tracing::debug!(%url, "fetching completed challenges");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::from_transport(e, self.timeout))?;
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::from_transport(e, self.timeout))?;

        check_reply(status, retry_after.as_deref(), &body)?;
        parse_completed_page(&body)
    }

    /// Fetch page 0, then the remaining pages when `all_pages` is set.
    pub(crate) async fn fetch_records(&self) -> Result<Vec<ChallengeRecord>, CatalogError> {
        let first = self.fetch_page(0).await?;
        let mut records = first.data;

        if self.all_pages {
            let total_pages = first.total_pages.unwrap_or(1);
            for page in 1..total_pages {
                let next = self.fetch_page(page).await?;
                records.extend(next.data);
            }
        }

        tracing::info!(
            count = records.len(),
            total_items = ?first.total_items,
            "fetched completed challenges"
        );
        Ok(records)
    }
}
