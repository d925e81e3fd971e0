// Runtime configuration, read once from the environment at startup.
// Only the token is required; the base URL and timeout exist so the CLI can
// be pointed at a proxy or a local mock server.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the Todoist API token.
pub const TOKEN_VAR: &str = "TODOIST_TOKEN";
/// Environment variable overriding the REST API base URL.
pub const API_URL_VAR: &str = "TODOIST_API_URL";
/// Environment variable overriding the request timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "TODOIST_TIMEOUT_MS";

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.todoist.com/rest/v1";
/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Where users can look up their API token.
pub const TOKEN_PAGE_URL: &str = "https://todoist.com/prefs/integrations";

/// Errors raised while building the configuration. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `TODOIST_TOKEN` is unset or empty.
    #[error("API token not set")]
    MissingToken,
    /// `TODOIST_TIMEOUT_MS` is not a number of milliseconds.
    #[error("invalid TODOIST_TIMEOUT_MS value '{0}': expected milliseconds")]
    InvalidTimeout(String),
}

/// Settings for one invocation. The base URL carries no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;
        let base_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout_ms = match get(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Config {
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}
