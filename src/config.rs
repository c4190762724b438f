//! Configuration for the Gmail MCP server
//!
//! Everything is environment-driven: the bearer token is supplied by an
//! external credential provider via `GMAIL_ACCESS_TOKEN` and re-read on every
//! tool call so a rotated token is picked up without a restart.

use std::time::Duration;

/// Environment variable holding the OAuth2 access token
pub const TOKEN_ENV_VAR: &str = "GMAIL_ACCESS_TOKEN";

/// Environment variable overriding the Gmail API base URL (used in tests)
pub const BASE_URL_ENV_VAR: &str = "GMAIL_API_BASE_URL";

/// Environment variable overriding the per-call HTTP timeout, in seconds
pub const TIMEOUT_ENV_VAR: &str = "GMAIL_HTTP_TIMEOUT_SECS";

/// Default per-call HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gmail MCP server
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the Gmail API, without a trailing slash
    pub api_base_url: String,

    /// Per-call HTTP timeout for the transport
    pub request_timeout: Duration,
}

impl Config {
    /// Build configuration from the environment.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var(BASE_URL_ENV_VAR)
            .unwrap_or_else(|_| gmail::API_BASE_URL.to_string());

        let request_timeout = std::env::var(TIMEOUT_ENV_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self {
            api_base_url,
            request_timeout,
        }
    }

    /// Read the bearer token for the current call. Returns `None` when the
    /// credential provider has not populated the environment.
    pub fn bearer_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Gmail API constants
pub mod gmail {
    /// Base URL for the Gmail API
    pub const API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

    /// OAuth scopes gating each tool family
    pub mod scopes {
        pub const READONLY: &str = "https://www.googleapis.com/auth/gmail.readonly";
        pub const SEND: &str = "https://www.googleapis.com/auth/gmail.send";
        pub const MODIFY: &str = "https://www.googleapis.com/auth/gmail.modify";
        pub const COMPOSE: &str = "https://www.googleapis.com/auth/gmail.compose";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = Config {
            api_base_url: gmail::API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        assert!(config.api_base_url.starts_with("https://gmail.googleapis.com"));
        assert!(!config.api_base_url.ends_with('/'));
    }

    #[test]
    fn test_timeout_default() {
        let config = Config::from_env();
        assert!(config.request_timeout >= Duration::from_secs(1));
    }
}
