//! API — answer client for the Nuranest Q&A backend.
//!
//! DESIGN
//! ======
//! `AnswerClient` owns a `QaBackend` (HTTP in production, mocks in tests) and
//! adds what every backend must share: the fixed client-side timeout and
//! request logging. It performs exactly one backend call per `ask`; there are
//! no retries anywhere in this crate.

pub mod http;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{ClientConfig, REQUEST_TIMEOUT_SECS};
pub use types::{Answer, ApiError, HealthInfo, QaBackend};

#[derive(Clone)]
pub struct AnswerClient {
    backend: Arc<dyn QaBackend>,
}

impl AnswerClient {
    #[must_use]
    pub fn new(backend: Arc<dyn QaBackend>) -> Self {
        Self { backend }
    }

    /// Build a client talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let backend = http::HttpBackend::new(config)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Ask one question. Fails with `ApiError::Timeout` once the fixed
    /// ceiling elapses; the backend future is dropped at that point.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reported, or a timeout.
    pub async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        info!(question_len = question.len(), "ask: sending question");
        let started = Instant::now();

        let result = match tokio::time::timeout(request_timeout(), self.backend.ask(question)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout { secs: REQUEST_TIMEOUT_SECS }),
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(answer) => info!(elapsed_ms, confidence = ?answer.confidence, "ask: answer received"),
            Err(e) => warn!(elapsed_ms, code = e.error_code(), error = %e, "ask: request failed"),
        }
        result
    }

    /// Probe backend availability once. The caller decides when to re-check.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport failure, non-2xx status, or timeout.
    pub async fn check_health(&self) -> Result<HealthInfo, ApiError> {
        let result = match tokio::time::timeout(request_timeout(), self.backend.health()).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout { secs: REQUEST_TIMEOUT_SECS }),
        };
        match &result {
            Ok(info) => info!(status = ?info.status, "health: backend reachable"),
            Err(e) => warn!(code = e.error_code(), error = %e, "health: backend unreachable"),
        }
        result
    }
}

fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
