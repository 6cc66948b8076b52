//! Line-oriented terminal loop over a `ChatSession`.
//!
//! DESIGN
//! ======
//! One task reads input lines and prints session events, so output order is
//! exactly event order. When input ends (or `/quit`) while a question is
//! outstanding, the loop keeps printing until that question settles; every
//! accepted question gets its assistant message on screen.
//!
//! Whether a question is outstanding is tracked from the events themselves
//! rather than from `ChatSession::is_busy`, since the store goes idle a few
//! events before the last event of a settlement is sent.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::render;
use crate::session::{ChatEvent, ChatSession, Notice};
use crate::state::Phase;

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

pub struct Repl<'a, W> {
    session: &'a ChatSession,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    docs_url: String,
    out: W,
    awaiting: bool,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(
        session: &'a ChatSession,
        events: mpsc::UnboundedReceiver<ChatEvent>,
        docs_url: impl Into<String>,
        out: W,
    ) -> Self {
        Self { session, events, docs_url: docs_url.into(), out, awaiting: false }
    }

    /// Print every event already queued without waiting for more.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn print_pending(&mut self) -> std::io::Result<()> {
        while let Ok(event) = self.events.try_recv() {
            self.print_event(event)?;
        }
        Ok(())
    }

    /// Run until `/quit` or end of input, then until any outstanding
    /// question has settled.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R>(&mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(line.trim()).await? {
                        break;
                    }
                }
                Some(event) = self.events.recv() => self.print_event(event)?,
            }
        }
        self.settle().await
    }

    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Returns `false` when the user asked to leave.
    async fn handle_line(&mut self, input: &str) -> std::io::Result<bool> {
        match input {
            "" => {}
            "/quit" | "/exit" => return Ok(false),
            "/help" => writeln!(self.out, "{}", render::HELP)?,
            "/clear" => self.session.clear(),
            "/health" => {
                self.session.check_health().await;
            }
            "/docs" => writeln!(self.out, "API docs: {}", self.docs_url)?,
            "/suggest" => writeln!(self.out, "{}", render::render_suggestions())?,
            _ if self.session.is_busy() => writeln!(self.out, "Still thinking about your last question...")?,
            _ => match render::suggestion(input) {
                Some(question) => self.session.submit(question),
                None => self.session.submit(input),
            },
        }
        Ok(true)
    }

    async fn settle(&mut self) -> std::io::Result<()> {
        self.print_pending()?;
        if self.awaiting {
            debug!("repl: input closed, waiting for outstanding answer");
        }
        while self.awaiting {
            match self.events.recv().await {
                Some(event) => self.print_event(event)?,
                None => break,
            }
        }
        self.print_pending()?;
        self.out.flush()
    }

    fn print_event(&mut self, event: ChatEvent) -> std::io::Result<()> {
        match event {
            ChatEvent::MessageAppended(msg) => writeln!(self.out, "{}", render::render_message(&msg))?,
            ChatEvent::Progress { step } => writeln!(self.out, "{}", render::render_thinking(step))?,
            ChatEvent::Connection(connection) => writeln!(self.out, "{}", render::render_connection(&connection))?,
            ChatEvent::Notice(notice) => {
                if matches!(notice, Notice::ResponseReceived | Notice::ResponseFailed) {
                    self.awaiting = false;
                }
                writeln!(self.out, "-- {notice}")?;
            }
            ChatEvent::PhaseChanged(Phase::Awaiting) => self.awaiting = true,
            ChatEvent::Cleared => self.awaiting = false,
            ChatEvent::PhaseChanged(Phase::Idle) => {}
        }
        Ok(())
    }
}
