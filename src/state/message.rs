use time::OffsetDateTime;

use crate::api::Answer;

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

/// Prefix wrapped around every failure shown in the conversation.
pub const APOLOGY_PREFIX: &str = "Sorry, I couldn't process your question right now. Please try again later.";

/// Creation-ordered message identifier. Never reused within a store, even
/// across clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One conversational turn. Immutable once appended to the store.
///
/// Only the constructors below build messages, which keeps answer metadata
/// and the error flag off user-authored turns.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub author: Author,
    pub created_at: OffsetDateTime,
    pub processing_time_secs: Option<f64>,
    pub confidence: Option<f64>,
    pub sources: Vec<String>,
    pub is_error: bool,
}

impl Message {
    pub(crate) fn user(id: MessageId, text: String, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text,
            author: Author::User,
            created_at,
            processing_time_secs: None,
            confidence: None,
            sources: Vec::new(),
            is_error: false,
        }
    }

    pub(crate) fn answer(id: MessageId, answer: Answer) -> Self {
        Self {
            id,
            text: answer.text,
            author: Author::Assistant,
            created_at: answer.timestamp,
            processing_time_secs: answer.processing_time_secs,
            confidence: answer.confidence,
            sources: answer.sources,
            is_error: false,
        }
    }

    pub(crate) fn failure(id: MessageId, error: &str, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text: apology(error),
            author: Author::Assistant,
            created_at,
            processing_time_secs: None,
            confidence: None,
            sources: Vec::new(),
            is_error: true,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    /// Confidence as a whole percentage, e.g. `0.92` -> `92`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence.map(|c| (c * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

/// Wrap a failure description in the user-facing apology.
#[must_use]
pub fn apology(error: &str) -> String {
    format!("{APOLOGY_PREFIX} Error: {error}")
}
