//! Chat session — drives the conversation store on the tokio runtime.
//!
//! DESIGN
//! ======
//! `ChatSession` is a cheap clonable handle. It turns store transitions into
//! side effects: a ticker task for the cosmetic progress steps, one spawned
//! task per accepted question for the backend call, and `ChatEvent`s on an
//! unbounded channel for whatever renders the conversation.
//!
//! Both tasks tag what they report with the generation captured at submit
//! time, so the store alone decides whether a late step or answer still
//! applies. The ticker is additionally aborted when the request settles or
//! the chat is cleared. The backend call itself is never aborted; its result
//! is simply discarded if the chat moved on.
//!
//! The store mutex is never held across an `.await`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{AnswerClient, HealthInfo};
use crate::config::PROGRESS_STEP_INTERVAL;
use crate::state::{Action, ConversationStore, Message, Phase, ProgressTicker, Transition};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connection {
    Connected(HealthInfo),
    Disconnected(String),
}

impl Connection {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

/// Short transient notifications for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    ResponseReceived,
    ResponseFailed,
    ChatCleared,
    Connected,
    ConnectionFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResponseReceived => "Response received!",
            Self::ResponseFailed => "Failed to get response from AI",
            Self::ChatCleared => "Chat cleared",
            Self::Connected => "Connected to Nuranest AI",
            Self::ConnectionFailed => "Failed to connect to AI service",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEvent {
    MessageAppended(Message),
    Progress { step: u8 },
    PhaseChanged(Phase),
    Cleared,
    Connection(Connection),
    Notice(Notice),
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

struct Inner {
    store: Mutex<ConversationStore>,
    /// Tagged with the generation it ticks for.
    ticker: Mutex<Option<(u64, ProgressTicker)>>,
    client: AnswerClient,
    events: mpsc::UnboundedSender<ChatEvent>,
    step_interval: Duration,
}

impl ChatSession {
    #[must_use]
    pub fn new(client: AnswerClient) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            store: Mutex::new(ConversationStore::new()),
            ticker: Mutex::new(None),
            client,
            events,
            step_interval: PROGRESS_STEP_INTERVAL,
        };
        (Self { inner: Arc::new(inner) }, rx)
    }

    /// Submit a question. Blank input, or input while a question is already
    /// outstanding, is dropped without any event.
    ///
    /// Must be called inside a tokio runtime.
    pub fn submit(&self, question: &str) {
        let Transition::Submitted { generation, question, message } =
            self.dispatch(Action::Submit { question: question.to_string() })
        else {
            return;
        };

        self.emit(ChatEvent::MessageAppended(message));
        self.emit(ChatEvent::PhaseChanged(Phase::Awaiting));
        self.start_ticker(generation);

        let session = self.clone();
        tokio::spawn(async move {
            let action = match session.inner.client.ask(&question).await {
                Ok(answer) => Action::AnswerResolved { generation, answer },
                Err(e) => Action::AnswerFailed { generation, error: e.to_string() },
            };
            session.finish(generation, action);
        });
    }

    /// Empty the conversation. Always succeeds; an outstanding request keeps
    /// running but its result will be discarded.
    pub fn clear(&self) {
        let Transition::Cleared { abandoned } = self.dispatch(Action::Clear) else {
            return;
        };
        self.stop_any_ticker();
        if let Some(generation) = abandoned {
            debug!(generation, "session: abandoning outstanding request");
            self.emit(ChatEvent::PhaseChanged(Phase::Idle));
        }
        self.emit(ChatEvent::Cleared);
        self.emit(ChatEvent::Notice(Notice::ChatCleared));
    }

    /// Probe the backend once and report the result as an event too.
    pub async fn check_health(&self) -> Connection {
        let (connection, notice) = match self.inner.client.check_health().await {
            Ok(info) => (Connection::Connected(info), Notice::Connected),
            Err(e) => (Connection::Disconnected(e.to_string()), Notice::ConnectionFailed),
        };
        self.emit(ChatEvent::Connection(connection.clone()));
        self.emit(ChatEvent::Notice(notice));
        connection
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock_store().messages().to_vec()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock_store().phase()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock_store().is_busy()
    }

    #[must_use]
    pub fn progress_step(&self) -> Option<u8> {
        self.lock_store().progress_step()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn start_ticker(&self, generation: u64) {
        let session = self.clone();
        let ticker = ProgressTicker::start(self.inner.step_interval, move |step| session.advance(generation, step));
        let previous = self.lock_ticker().replace((generation, ticker));
        drop(previous);
    }

    /// Stop the ticker only if it still belongs to `generation`; a newer
    /// question may already have installed its own.
    fn stop_ticker(&self, generation: u64) {
        let ticker = {
            let mut slot = self.lock_ticker();
            match *slot {
                Some((owner, _)) if owner == generation => slot.take(),
                _ => None,
            }
        };
        drop(ticker);
    }

    fn stop_any_ticker(&self) {
        let ticker = self.lock_ticker().take();
        drop(ticker);
    }

    fn advance(&self, generation: u64, step: u8) -> bool {
        match self.dispatch(Action::Progress { generation, step }) {
            Transition::Progressed { step } => {
                self.emit(ChatEvent::Progress { step });
                true
            }
            _ => false,
        }
    }

    fn finish(&self, generation: u64, action: Action) {
        match self.dispatch(action) {
            Transition::Settled { message } => {
                self.stop_ticker(generation);
                let notice = if message.is_error { Notice::ResponseFailed } else { Notice::ResponseReceived };
                self.emit(ChatEvent::MessageAppended(message));
                self.emit(ChatEvent::PhaseChanged(Phase::Idle));
                self.emit(ChatEvent::Notice(notice));
            }
            Transition::Ignored(reason) => debug!(?reason, "session: discarding settled request"),
            other => debug!(?other, "session: unexpected settle transition"),
        }
    }

    fn dispatch(&self, action: Action) -> Transition {
        self.lock_store().dispatch(action)
    }

    /// A closed receiver means nobody is rendering; the state still moves.
    fn emit(&self, event: ChatEvent) {
        let _ = self.inner.events.send(event);
    }

    fn lock_store(&self) -> MutexGuard<'_, ConversationStore> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<(u64, ProgressTicker)>> {
        self.inner
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
