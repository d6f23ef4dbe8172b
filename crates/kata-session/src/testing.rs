//! Scripted [`SessionDriver`] for tests that must not start a browser.

use std::collections::HashSet;
use std::time::Duration;

use kata_core::ChallengeId;

use crate::{LoginOutcome, SessionDriver, SessionError, solutions_url};

/// One call received by a [`ScriptedDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Login { username: String },
    Open { challenge_id: String, language: String },
    Wait(String),
    Click(String),
    ExtractText(String),
    ExtractRenderedText(String),
}

/// In-memory driver whose pages always render, except where told otherwise.
///
/// Extracted text is `"{id}:{language}:code"` and
/// `"{id}:{language}:description"`.
#[derive(Debug)]
pub struct ScriptedDriver {
    login_outcome: LoginOutcome,
    hidden: HashSet<(String, String)>,
    broken: HashSet<String>,
    current: Option<(String, String)>,
    pub calls: Vec<DriverCall>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_outcome: LoginOutcome::Completed,
            hidden: HashSet::new(),
            broken: HashSet::new(),
            current: None,
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_login_outcome(mut self, outcome: LoginOutcome) -> Self {
        self.login_outcome = outcome;
        self
    }

    /// `selector` never becomes visible on `language` pages.
    #[must_use]
    pub fn hide(mut self, language: &str, selector: &str) -> Self {
        self.hidden.insert((language.to_string(), selector.to_string()));
        self
    }

    /// Navigating to any `language` page fails outright.
    #[must_use]
    pub fn break_language(mut self, language: &str) -> Self {
        self.broken.insert(language.to_string());
        self
    }

    /// Languages of every page opened so far, in order.
    #[must_use]
    pub fn opened_languages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DriverCall::Open { language, .. } => Some(language.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, DriverCall::Login { .. }))
    }

    fn current_text(&self, part: &str) -> Result<String, SessionError> {
        self.current
            .as_ref()
            .map(|(id, language)| format!("{id}:{language}:{part}"))
            .ok_or_else(|| SessionError::MissingElement {
                selector: part.to_string(),
            })
    }
}

impl SessionDriver for ScriptedDriver {
    async fn login(
        &mut self,
        username: &str,
        _password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        self.calls.push(DriverCall::Login {
            username: username.to_string(),
        });
        Ok(self.login_outcome)
    }

    async fn open_solutions_page(
        &mut self,
        challenge_id: &ChallengeId,
        language: &str,
    ) -> Result<(), SessionError> {
        self.calls.push(DriverCall::Open {
            challenge_id: challenge_id.to_string(),
            language: language.to_string(),
        });
        if self.broken.contains(language) {
            self.current = None;
            return Err(SessionError::Navigation {
                url: solutions_url("https://scripted.invalid", challenge_id, language),
                reason: "scripted failure".to_string(),
            });
        }
        self.current = Some((challenge_id.to_string(), language.to_string()));
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        self.calls.push(DriverCall::Wait(selector.to_string()));
        let hidden = self.current.as_ref().is_some_and(|(_, language)| {
            self.hidden
                .contains(&(language.clone(), selector.to_string()))
        });
        if hidden {
            return Err(SessionError::NavigationTimeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), SessionError> {
        self.calls.push(DriverCall::Click(selector.to_string()));
        Ok(())
    }

    async fn extract_text(&mut self, selector: &str) -> Result<String, SessionError> {
        self.calls.push(DriverCall::ExtractText(selector.to_string()));
        self.current_text("code")
    }

    async fn extract_rendered_text(&mut self, selector: &str) -> Result<String, SessionError> {
        self.calls
            .push(DriverCall::ExtractRenderedText(selector.to_string()));
        self.current_text("description")
    }
}
