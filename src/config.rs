//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Only the backend base URL is configurable. Endpoint paths, the request
//! timeout and the progress cadence are fixed constants so every client
//! behaves the same against a given backend.

use std::time::Duration;

pub const API_URL_ENV: &str = "NURANEST_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ASK_PATH: &str = "/api/v1/ai/ask";
pub const DOCS_PATH: &str = "/docs";

pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Delay between synthetic "thinking" steps.
pub const PROGRESS_STEP_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Build config from `NURANEST_API_URL`, falling back to the local
    /// development backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&raw)
    }

    /// Build config from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self { base_url: trimmed.to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn ask_url(&self) -> String {
        format!("{}{ASK_PATH}", self.base_url)
    }

    /// Health probe target: the service root.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    #[must_use]
    pub fn docs_url(&self) -> String {
        format!("{}{DOCS_PATH}", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_string() }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
