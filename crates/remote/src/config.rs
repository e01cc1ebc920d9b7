//! Connection parameters for the remote inventory API.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::retry::RetryPolicy;

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("remote base URL is not configured")]
    MissingBaseUrl,

    #[error("remote access token is not configured")]
    MissingToken,

    #[error("invalid remote base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("access token cannot be sent as an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

/// Base URL plus static bearer token. Both are guaranteed non-empty.
///
/// Equality is used to decide whether a cached client is still valid.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();

        if base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self { base_url, token })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl core::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Transport tuning shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("https://shop.example.com/", "t0k").unwrap();
        assert_eq!(config.base_url(), "https://shop.example.com");
        assert_eq!(config.token(), "t0k");
    }

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(ClientConfig::new("", "tok"), Err(ConfigError::MissingBaseUrl));
        assert_eq!(
            ClientConfig::new("https://shop.example.com", "  "),
            Err(ConfigError::MissingToken)
        );
    }

    #[test]
    fn non_http_urls_are_rejected() {
        assert!(matches!(
            ClientConfig::new("ftp://shop.example.com", "tok"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("not a url", "tok"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = ClientConfig::new("https://shop.example.com", "secret-token").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
