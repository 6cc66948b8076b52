//! HTTP backend for the Nuranest Q&A service.
//!
//! Thin reqwest wrapper for `POST /api/v1/ai/ask` and `GET /`. Pure parsing
//! in `parse_answer` / `parse_error_body` / `parse_health_response` for
//! testability.
//!
//! The overall request ceiling is enforced one level up by `AnswerClient`;
//! this client only bounds the connect phase.

use std::time::Duration;

use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::warn;

use super::types::{Answer, ApiError, HealthInfo, QaBackend};
use crate::config::{CONNECT_TIMEOUT_SECS, ClientConfig};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    ask_url: String,
    health_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns an error if the reqwest client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, ask_url: config.ask_url(), health_url: config.health_url() })
    }
}

#[async_trait::async_trait]
impl QaBackend for HttpBackend {
    async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        let body = AskRequest { question };

        let response = self
            .http
            .post(&self.ask_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &text));
        }

        parse_answer(&text)
    }

    async fn health(&self) -> Result<HealthInfo, ApiError> {
        let response = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        parse_health_response(status.as_u16(), &text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Required fields are `Option` so a missing one is reported as a malformed
/// response with a precise reason instead of a serde message.
#[derive(serde::Deserialize)]
struct AskResponse {
    answer: Option<String>,
    timestamp: Option<String>,
    processing_time: Option<f64>,
    confidence_score: Option<f64>,
    sources: Option<Vec<Value>>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_answer(json: &str) -> Result<Answer, ApiError> {
    let api: AskResponse = serde_json::from_str(json).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

    let text = api
        .answer
        .ok_or_else(|| ApiError::MalformedResponse("missing `answer`".into()))?;
    let raw_timestamp = api
        .timestamp
        .ok_or_else(|| ApiError::MalformedResponse("missing `timestamp`".into()))?;
    let timestamp = parse_timestamp(&raw_timestamp)
        .ok_or_else(|| ApiError::MalformedResponse(format!("unparseable `timestamp`: {raw_timestamp}")))?;

    let confidence = api.confidence_score.filter(|c| {
        let valid = c.is_finite() && (0.0..=1.0).contains(c);
        if !valid {
            warn!(confidence = c, "dropping out-of-range confidence score");
        }
        valid
    });
    let processing_time_secs = api.processing_time.filter(|t| t.is_finite() && *t >= 0.0);

    let sources = api
        .sources
        .unwrap_or_default()
        .into_iter()
        .map(|source| match source {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    Ok(Answer { text, timestamp, processing_time_secs, confidence, sources })
}

/// Map a non-2xx body to `ApiError::Backend`. Bodies that are not JSON, or
/// JSON without `error`, fall back to the generic message.
pub(crate) fn parse_error_body(status: u16, body: &str) -> ApiError {
    let error = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|value| match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });
    ApiError::Backend { status, error }
}

/// A non-2xx root means the service is down regardless of what the body says.
pub(crate) fn parse_health_response(status: u16, body: &str) -> Result<HealthInfo, ApiError> {
    if !(200..300).contains(&status) {
        warn!(status, "health check got non-success status");
        return Err(ApiError::Unavailable { status });
    }
    Ok(parse_health(body))
}

/// Any 2xx body is evidence enough; decode what we can and ignore the rest.
pub(crate) fn parse_health(body: &str) -> HealthInfo {
    serde_json::from_str(body).unwrap_or_default()
}

/// RFC 3339 first, then the offset-less ISO-8601 form Python's
/// `datetime.isoformat()` produces, read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
