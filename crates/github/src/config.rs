//! Connection settings for the GitHub GraphQL API.
//!
//! A [`GithubConfig`] is built once by the composition root and handed to
//! [`crate::HttpTransport`] and [`crate::GithubProjectBoard`]. Nothing in this
//! crate reads credentials from the environment on its own.

use std::time::Duration;

use board::Owner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GitHub's public GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const fn default_timeout_secs() -> u64 {
    30
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    concat!("sprintboard/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Errors raised while validating configuration or building the HTTP client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API token was configured.
    #[error("GitHub token is not configured")]
    MissingToken,

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A bearer token for the GitHub API.
///
/// `Debug` never prints the secret. Surrounding whitespace is trimmed, also
/// when the token is deserialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiToken(String);

impl TryFrom<String> for ApiToken {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| ConfigError::InvalidValue {
            field: "token".into(),
            reason: "must not be empty".into(),
        })
    }
}

impl From<ApiToken> for String {
    fn from(token: ApiToken) -> Self {
        token.0
    }
}

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the raw secret for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// GitHub connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// GraphQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Personal access token or app installation token.
    #[serde(default)]
    pub token: Option<ApiToken>,

    /// Organization or user that owns the project boards.
    ///
    /// When unset, the login of the token's own user is used.
    #[serde(default)]
    pub owner: Option<Owner>,

    /// `User-Agent` header sent with every request (GitHub rejects requests
    /// without one).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            owner: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    /// Returns the configured token.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingToken`] if none is set.
    pub fn token(&self) -> Result<&ApiToken, ConfigError> {
        self.token.as_ref().ok_or(ConfigError::MissingToken)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks that the configuration can be used to talk to GitHub.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingToken`] or [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "endpoint".into(),
                reason: format!("'{}' is not an http(s) URL", self.endpoint),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "user_agent".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GithubConfig {
        GithubConfig {
            token: ApiToken::new("ghp_secret"),
            ..GithubConfig::default()
        }
    }

    #[test]
    fn defaults_point_at_public_api() {
        let config = GithubConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("sprintboard/"));
        assert!(config.owner.is_none());
    }

    #[test]
    fn missing_token_fails_validation() {
        let err = GithubConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn non_http_endpoint_fails_validation() {
        let config = GithubConfig {
            endpoint: "api.github.com/graphql".into(),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "endpoint"
        ));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = GithubConfig {
            timeout_secs: 0,
            ..configured()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_is_trimmed_and_redacted() {
        let token = ApiToken::new("  ghp_secret\n").unwrap();
        assert_eq!(token.expose(), "ghp_secret");
        assert_eq!(format!("{token:?}"), "ApiToken(***)");
        assert!(ApiToken::new("   ").is_none());
        assert!(!format!("{:?}", configured()).contains("ghp_secret"));
    }

    #[test]
    fn deserialized_values_are_validated() {
        let config: GithubConfig =
            serde_json::from_value(serde_json::json!({ "token": " ghp_secret\n" })).unwrap();
        assert_eq!(config.token().unwrap().expose(), "ghp_secret");

        let blank_token = serde_json::from_value::<GithubConfig>(serde_json::json!({ "token": "  " }));
        assert!(blank_token.is_err());

        let blank_owner = serde_json::from_value::<GithubConfig>(serde_json::json!({ "owner": "" }));
        assert!(blank_owner.is_err());
    }
}
