//! API types — answer records, health info, and errors.
//!
//! Transport-neutral types shared by the HTTP backend, the answer client and
//! the conversation store.

use time::OffsetDateTime;

/// Fallback text when the backend fails without a structured `error` field.
pub const GENERIC_FAILURE: &str = "Failed to get answer";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls.
///
/// `Display` is the human-readable message shown inside the conversation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// DNS, connect, or read failure before a response was available.
    #[error("Network error: {0}")]
    Transport(String),

    /// The client-side ceiling elapsed before the backend answered.
    #[error("The request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// The backend returned a non-success HTTP status.
    #[error("{}", .error.as_deref().unwrap_or(GENERIC_FAILURE))]
    Backend { status: u16, error: Option<String> },

    /// The health check got a non-success HTTP status.
    #[error("API is not available")]
    Unavailable { status: u16 },

    /// 2xx response without the required fields, or an unparseable body.
    #[error("Failed to get answer: malformed response ({0})")]
    MalformedResponse(String),
}

impl ApiError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Timeout { .. } => "E_TIMEOUT",
            Self::Backend { .. } => "E_BACKEND",
            Self::Unavailable { .. } => "E_UNAVAILABLE",
            Self::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
        }
    }
}

// =============================================================================
// ANSWER
// =============================================================================

/// A successful backend answer, normalized from the wire body.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub timestamp: OffsetDateTime,
    pub processing_time_secs: Option<f64>,
    /// Always within `[0, 1]` when present.
    pub confidence: Option<f64>,
    pub sources: Vec<String>,
}

// =============================================================================
// HEALTH
// =============================================================================

/// Whatever the service root chose to tell us. Every field is optional; the
/// probe only cares that a 2xx arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Out-of-process Q&A service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait QaBackend: Send + Sync {
    /// Ask one question and wait for the complete answer.
    async fn ask(&self, question: &str) -> Result<Answer, ApiError>;

    /// Probe service availability.
    async fn health(&self) -> Result<HealthInfo, ApiError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
