//! Conversation store — message history plus the single-flight request
//! state machine.
//!
//! DESIGN
//! ======
//! Every change goes through `dispatch(Action) -> Transition`. The store is
//! synchronous and owns no tasks; the session layer turns transitions into
//! side effects (start the ticker, spawn the request, notify the UI).
//!
//! ```text
//! Idle     --Submit(valid)-----> Awaiting   (user message appended)
//! Awaiting --AnswerResolved----> Idle       (answer appended)
//! Awaiting --AnswerFailed------> Idle       (apology appended)
//! any      --Clear-------------> Idle       (history emptied)
//! ```
//!
//! A failed request does not rest in a separate phase: the apology message
//! is appended and the phase returns to `Idle` in the same transition.
//!
//! GENERATIONS
//! ===========
//! `Submit` and `Clear` both bump a monotonically increasing generation.
//! Async work captures the generation current when it started and tags its
//! actions with it; an action carrying any other generation is discarded.
//! That is what keeps a request that settles after `Clear` out of the new
//! history, and a late ticker step off the screen.

use time::OffsetDateTime;
use tracing::debug;

use super::message::{Message, MessageId};
use super::ticker::TOTAL_STEPS;
use crate::api::Answer;

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Awaiting,
}

/// The one allowed in-flight request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestState {
    pub phase: Phase,
    /// 0..=4; meaningful only while `Awaiting`.
    pub progress_step: u8,
    pub generation: u64,
}

#[derive(Debug)]
pub enum Action {
    Submit { question: String },
    Progress { generation: u64, step: u8 },
    AnswerResolved { generation: u64, answer: Answer },
    AnswerFailed { generation: u64, error: String },
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyQuestion,
    Busy,
    /// Tagged with a generation that is no longer current.
    Stale,
    /// Current generation, but nothing is outstanding.
    NotAwaiting,
    /// Progress that would skip a step or run past the last one.
    OutOfOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Ignored(IgnoreReason),
    /// The caller must now start the ticker and issue the request.
    Submitted { generation: u64, question: String, message: Message },
    Progressed { step: u8 },
    Settled { message: Message },
    /// `abandoned` is the generation of the request left outstanding, if any.
    Cleared { abandoned: Option<u64> },
}

#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    request: RequestState,
    next_id: u64,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: Action) -> Transition {
        let transition = match action {
            Action::Submit { question } => self.submit(&question),
            Action::Progress { generation, step } => self.progress(generation, step),
            Action::AnswerResolved { generation, answer } => {
                self.settle(generation, |id| Message::answer(id, answer))
            }
            Action::AnswerFailed { generation, error } => {
                self.settle(generation, |id| Message::failure(id, &error, OffsetDateTime::now_utc()))
            }
            Action::Clear => self.clear(),
        };
        if let Transition::Ignored(reason) = &transition {
            debug!(?reason, generation = self.request.generation, "store: action ignored");
        }
        transition
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn request(&self) -> RequestState {
        self.request
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.request.phase
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.request.phase == Phase::Awaiting
    }

    /// Current ticker step, `None` unless a request is outstanding.
    #[must_use]
    pub fn progress_step(&self) -> Option<u8> {
        self.is_busy().then_some(self.request.progress_step)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    fn submit(&mut self, question: &str) -> Transition {
        let question = question.trim();
        if question.is_empty() {
            return Transition::Ignored(IgnoreReason::EmptyQuestion);
        }
        if self.is_busy() {
            return Transition::Ignored(IgnoreReason::Busy);
        }

        let message = Message::user(self.allocate_id(), question.to_string(), OffsetDateTime::now_utc());
        self.messages.push(message.clone());

        self.request.generation += 1;
        self.request.phase = Phase::Awaiting;
        self.request.progress_step = 0;

        Transition::Submitted { generation: self.request.generation, question: question.to_string(), message }
    }

    fn progress(&mut self, generation: u64, step: u8) -> Transition {
        if let Err(reason) = self.check_current(generation) {
            return Transition::Ignored(reason);
        }
        if step != self.request.progress_step + 1 || step > TOTAL_STEPS {
            return Transition::Ignored(IgnoreReason::OutOfOrder);
        }
        self.request.progress_step = step;
        Transition::Progressed { step }
    }

    fn settle(&mut self, generation: u64, build: impl FnOnce(MessageId) -> Message) -> Transition {
        if let Err(reason) = self.check_current(generation) {
            return Transition::Ignored(reason);
        }
        let message = build(self.allocate_id());
        self.messages.push(message.clone());
        self.request.phase = Phase::Idle;
        self.request.progress_step = 0;
        Transition::Settled { message }
    }

    fn clear(&mut self) -> Transition {
        let abandoned = self.is_busy().then_some(self.request.generation);
        self.messages.clear();
        self.request.generation += 1;
        self.request.phase = Phase::Idle;
        self.request.progress_step = 0;
        Transition::Cleared { abandoned }
    }

    fn check_current(&self, generation: u64) -> Result<(), IgnoreReason> {
        if generation != self.request.generation {
            return Err(IgnoreReason::Stale);
        }
        if !self.is_busy() {
            return Err(IgnoreReason::NotAwaiting);
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }
}
