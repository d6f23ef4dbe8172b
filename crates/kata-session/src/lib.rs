//! # kata-session
//!
//! Browser automation for the pages a plain HTTP client cannot read: the
//! sign-in form and the client-rendered solution pages.
//!
//! [`SessionDriver`] is the seam the sync pipeline talks to. The session
//! handle is passed explicitly to every call; [`WebDriverSession`] is the
//! `fantoccini` implementation and [`scrape`] holds the per-language
//! scraping state machine built on top of the trait.

mod error;
pub mod scrape;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
mod webdriver;

pub use error::SessionError;
pub use scrape::{LanguageScrape, RecordScrape, ScrapeStage, Scraper, SkippedLanguage};
pub use webdriver::WebDriverSession;

use std::fmt;
use std::time::Duration;

use kata_core::ChallengeId;

/// How a sign-in attempt ended.
///
/// Sign-in is best effort: the driver reports what it observed and the
/// caller decides whether to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The post-submit page finished loading away from the sign-in form.
    Completed,
    /// The page did not report `readyState == "complete"` in time.
    LoadTimedOut,
    /// The page loaded but is still the sign-in form (bad credentials,
    /// captcha, ...).
    StillOnSignIn,
}

impl LoginOutcome {
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::LoadTimedOut => "page load timed out",
            Self::StillOnSignIn => "still on sign-in page",
        })
    }
}

/// Operations on a live browser session.
#[allow(async_fn_in_trait)]
pub trait SessionDriver {
    /// Submit the sign-in form and wait for the resulting page load.
    async fn login(&mut self, username: &str, password: &str) -> Result<LoginOutcome, SessionError>;

    /// Navigate to the user's own solutions for `challenge_id` in `language`.
    async fn open_solutions_page(
        &mut self,
        challenge_id: &ChallengeId,
        language: &str,
    ) -> Result<(), SessionError>;

    /// Block until the first element matching `selector` is visible.
    ///
    /// Fails with [`SessionError::NavigationTimeout`] once `timeout` elapses.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<(), SessionError>;

    /// Raw `textContent` of the first element matching `selector`.
    async fn extract_text(&mut self, selector: &str) -> Result<String, SessionError>;

    /// Rendered (visible) text of the first element matching `selector`.
    async fn extract_rendered_text(&mut self, selector: &str) -> Result<String, SessionError>;
}

/// URL of the signed-in user's solutions for one challenge and language.
#[must_use]
pub fn solutions_url(site_url: &str, challenge_id: &ChallengeId, language: &str) -> String {
    format!(
        "{}/kata/{}/solutions/{}/me",
        site_url.trim_end_matches('/'),
        urlencoding::encode(challenge_id.as_str()),
        urlencoding::encode(language)
    )
}

/// URL of the sign-in form.
#[must_use]
pub fn sign_in_url(site_url: &str) -> String {
    format!("{}/users/sign_in", site_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solutions_url_is_deterministic() {
        let id = ChallengeId::new("514b92a657cdc65150000006");
        assert_eq!(
            solutions_url("https://www.codewars.com/", &id, "ruby"),
            "https://www.codewars.com/kata/514b92a657cdc65150000006/solutions/ruby/me"
        );
    }

    #[test]
    fn solutions_url_encodes_segments() {
        let id = ChallengeId::new("a/b");
        assert_eq!(
            solutions_url("https://example.com", &id, "c#"),
            "https://example.com/kata/a%2Fb/solutions/c%23/me"
        );
    }

    #[test]
    fn sign_in_url_trims_trailing_slash() {
        assert_eq!(
            sign_in_url("https://www.codewars.com/"),
            "https://www.codewars.com/users/sign_in"
        );
    }

    #[test]
    fn login_outcome_display() {
        assert_eq!(LoginOutcome::Completed.to_string(), "completed");
        assert!(!LoginOutcome::StillOnSignIn.is_completed());
    }
}
