//! Site account credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Sign-in identifier (the site's login form takes an email).
    #[serde(default)]
    pub username: String,

    /// Sign-in secret.
    #[serde(default)]
    pub password: String,
}

impl AccountConfig {
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Fail with the names of the missing fields.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::not_configured("account", &missing))
        }
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_empty() { "" } else { "<redacted>" },
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!AccountConfig::default().is_configured());
    }

    #[test]
    fn require_lists_missing_fields() {
        let config = AccountConfig {
            username: "me@example.com".into(),
            ..Default::default()
        };
        let err = config.require().unwrap_err();
        assert!(err.to_string().contains("password"));
        assert!(!err.to_string().contains("username"));
    }

    #[test]
    fn debug_redacts_password() {
        let config = AccountConfig {
            username: "me@example.com".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("me@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
