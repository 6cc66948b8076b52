//! Scripted `QaBackend` for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use time::macros::datetime;
use tokio::sync::oneshot;

use super::types::{Answer, ApiError, HealthInfo, QaBackend};

/// How the mock answers the next `ask`.
pub(crate) enum Reply {
    Ready(Result<Answer, ApiError>),
    Delayed(Duration, Result<Answer, ApiError>),
    /// Resolves when the test sends on the paired sender.
    Gated(oneshot::Receiver<Result<Answer, ApiError>>),
    Never,
}

#[derive(Clone, Copy)]
pub(crate) enum HealthReply {
    Up,
    Down,
    Never,
}

pub(crate) struct MockBackend {
    replies: Mutex<VecDeque<Reply>>,
    health: HealthReply,
    calls: AtomicUsize,
    questions: Mutex<Vec<String>>,
}

impl MockBackend {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self::with_health(replies, HealthReply::Up)
    }

    pub(crate) fn with_health(replies: Vec<Reply>, health: HealthReply) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            health,
            calls: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QaBackend for MockBackend {
    async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().unwrap().push(question.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            None => Ok(sample_answer("done")),
            Some(Reply::Ready(result)) => result,
            Some(Reply::Delayed(delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".into()))),
            Some(Reply::Never) => std::future::pending().await,
        }
    }

    async fn health(&self) -> Result<HealthInfo, ApiError> {
        match self.health {
            HealthReply::Up => Ok(HealthInfo { status: Some("running".into()), ..HealthInfo::default() }),
            HealthReply::Down => Err(ApiError::Transport("connection refused".into())),
            HealthReply::Never => std::future::pending().await,
        }
    }
}

pub(crate) fn sample_answer(text: &str) -> Answer {
    Answer {
        text: text.to_string(),
        timestamp: datetime!(2024-01-01 00:00:00 UTC),
        processing_time_secs: None,
        confidence: None,
        sources: Vec::new(),
    }
}
