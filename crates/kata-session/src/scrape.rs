//! Per-language solution scraping.
//!
//! Each language walks a fixed sequence of stages:
//!
//! ```text
//! Navigating → WaitingForToggle → WaitingForCode → WaitingForDescription → Done
//! ```
//!
//! A [`SessionError::NavigationTimeout`] in any waiting stage ends that
//! language as [`LanguageScrape::Skipped`]; there is no retry. Every other
//! session error is returned to the caller.

use std::time::Duration;

use kata_config::SelectorConfig;
use kata_core::{ChallengeId, ChallengeRecord, Solution};
use serde::Serialize;

use crate::{SessionDriver, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStage {
    Navigating,
    WaitingForToggle,
    WaitingForCode,
    WaitingForDescription,
    Done,
}

/// A language that produced no solution, and where it stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLanguage {
    pub language: String,
    pub stage: ScrapeStage,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageScrape {
    Collected(Solution),
    Skipped(SkippedLanguage),
}

/// Everything one record's scrape produced, in completed-language order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordScrape {
    pub solutions: Vec<Solution>,
    pub skipped: Vec<SkippedLanguage>,
}

/// Drives the stage sequence against any [`SessionDriver`].
#[derive(Debug, Clone)]
pub struct Scraper {
    selectors: SelectorConfig,
    timeout: Duration,
}

impl Scraper {
    #[must_use]
    pub const fn new(selectors: SelectorConfig, timeout: Duration) -> Self {
        Self { selectors, timeout }
    }

    /// Scrape every completed language of `record`, one after another.
    ///
    /// `on_language` is called after each language finishes, collected or
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first non-timeout [`SessionError`]; languages already
    /// scraped for this record are discarded with it.
    pub async fn scrape_record<D, F>(
        &self,
        driver: &mut D,
        record: &ChallengeRecord,
        mut on_language: F,
    ) -> Result<RecordScrape, SessionError>
    where
        D: SessionDriver,
        F: FnMut(&LanguageScrape),
    {
        let mut result = RecordScrape::default();
        for language in &record.completed_languages {
            let outcome = self.scrape_language(driver, &record.id, language).await?;
            on_language(&outcome);
            match outcome {
                LanguageScrape::Collected(solution) => result.solutions.push(solution),
                LanguageScrape::Skipped(skipped) => result.skipped.push(skipped),
            }
        }
        Ok(result)
    }

    /// Scrape one language of one challenge.
    ///
    /// # Errors
    ///
    /// Returns any [`SessionError`] other than a navigation timeout.
    pub async fn scrape_language<D: SessionDriver>(
        &self,
        driver: &mut D,
        challenge_id: &ChallengeId,
        language: &str,
    ) -> Result<LanguageScrape, SessionError> {
        tracing::info!(%challenge_id, language, "scraping solution");
        let mut stage = ScrapeStage::Navigating;

        match self.run_stages(driver, challenge_id, language, &mut stage).await {
            Ok(solution) => {
                tracing::debug!(
                    %challenge_id,
                    language,
                    code_len = solution.code.len(),
                    "solution collected"
                );
                Ok(LanguageScrape::Collected(solution))
            }
            Err(error) if error.is_timeout() => {
                tracing::warn!(%challenge_id, language, ?stage, %error, "skipping language");
                Ok(LanguageScrape::Skipped(SkippedLanguage {
                    language: language.to_string(),
                    stage,
                    reason: error.to_string(),
                }))
            }
            Err(error) => Err(error),
        }
    }

    async fn run_stages<D: SessionDriver>(
        &self,
        driver: &mut D,
        challenge_id: &ChallengeId,
        language: &str,
        stage: &mut ScrapeStage,
    ) -> Result<Solution, SessionError> {
        let selectors = &self.selectors;

        driver.open_solutions_page(challenge_id, language).await?;

        *stage = ScrapeStage::WaitingForToggle;
        driver.wait_for_selector(&selectors.toggle, self.timeout).await?;
        driver.click(&selectors.toggle).await?;

        *stage = ScrapeStage::WaitingForCode;
        driver.wait_for_selector(&selectors.code, self.timeout).await?;
        let code = driver.extract_text(&selectors.code).await?;

        *stage = ScrapeStage::WaitingForDescription;
        driver
            .wait_for_selector(&selectors.description, self.timeout)
            .await?;
        let description = driver.extract_rendered_text(&selectors.description).await?;

        *stage = ScrapeStage::Done;
        Ok(Solution {
            language: language.to_string(),
            code,
            description,
        })
    }
}
