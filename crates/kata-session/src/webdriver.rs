//! `fantoccini`-backed [`SessionDriver`].

use std::time::Duration;

use fantoccini::{Client, ClientBuilder, Locator};
use kata_config::BrowserConfig;
use kata_core::ChallengeId;
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::{LoginOutcome, SessionDriver, SessionError, sign_in_url, solutions_url};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const TEXT_CONTENT_SCRIPT: &str =
    "const el = document.querySelector(arguments[0]); return el ? el.textContent : null;";

/// A live WebDriver session.
///
/// Owns the remote browser until [`WebDriverSession::close`] is called.
/// Callers are expected to close it on every exit path; the WebDriver
/// server keeps the browser open otherwise.
pub struct WebDriverSession {
    client: Client,
    site_url: String,
    wait_timeout: Duration,
}

impl WebDriverSession {
    /// Start a Chrome session on the configured WebDriver endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connect`] when the endpoint is unreachable or
    /// refuses the requested capabilities.
    pub async fn connect(config: &BrowserConfig) -> Result<Self, SessionError> {
        let mut args = vec![format!("--user-agent={}", config.user_agent)];
        if config.headless {
            args.push("--headless=new".to_string());
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| SessionError::Connect {
                url: config.webdriver_url.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            webdriver = %config.webdriver_url,
            headless = config.headless,
            "browser session started"
        );
        Ok(Self {
            client,
            site_url: config.site_url.clone(),
            wait_timeout: config.wait_timeout(),
        })
    }

    /// End the WebDriver session and close the browser.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WebDriver`] if the server rejects the request.
    pub async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        tracing::info!("browser session closed");
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        tracing::debug!(%url, "navigating");
        self.client
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether the first element matching `selector` exists and is displayed.
    async fn first_displayed(&self, selector: &str) -> Result<bool, SessionError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        match elements.first() {
            // A client-side re-render can detach the element between the
            // lookup and the visibility check; the next poll retries.
            Some(element) => Ok(element.is_displayed().await.unwrap_or(false)),
            None => Ok(false),
        }
    }

    /// Poll `document.readyState` until it reads `complete`.
    ///
    /// Returns `false` if the deadline passes first.
    async fn wait_for_ready_state(&self, timeout: Duration) -> Result<bool, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self
                .client
                .execute("return document.readyState", Vec::new())
                .await?;
            if state == "complete" {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl SessionDriver for WebDriverSession {
    async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        let url = sign_in_url(&self.site_url);
        self.goto(&url).await?;
        self.wait_for_selector("#user_email", self.wait_timeout).await?;

        self.client
            .find(Locator::Id("user_email"))
            .await?
            .send_keys(username)
            .await?;
        self.client
            .find(Locator::Id("user_password"))
            .await?
            .send_keys(password)
            .await?;
        self.client.find(Locator::Css(".btn")).await?.click().await?;

        if !self.wait_for_ready_state(self.wait_timeout).await? {
            return Ok(LoginOutcome::LoadTimedOut);
        }

        let current = self.client.current_url().await?;
        if current.path().starts_with("/users/sign_in") {
            Ok(LoginOutcome::StillOnSignIn)
        } else {
            Ok(LoginOutcome::Completed)
        }
    }

    async fn open_solutions_page(
        &mut self,
        challenge_id: &ChallengeId,
        language: &str,
    ) -> Result<(), SessionError> {
        let url = solutions_url(&self.site_url, challenge_id, language);
        self.goto(&url).await
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.first_displayed(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::NavigationTimeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), SessionError> {
        self.client.find(Locator::Css(selector)).await?.click().await?;
        Ok(())
    }

    async fn extract_text(&mut self, selector: &str) -> Result<String, SessionError> {
        let value = self
            .client
            .execute(TEXT_CONTENT_SCRIPT, vec![Value::String(selector.to_string())])
            .await?;
        match value {
            Value::String(text) => Ok(text),
            _ => Err(SessionError::MissingElement {
                selector: selector.to_string(),
            }),
        }
    }

    async fn extract_rendered_text(&mut self, selector: &str) -> Result<String, SessionError> {
        let text = self.client.find(Locator::Css(selector)).await?.text().await?;
        Ok(text)
    }
}
