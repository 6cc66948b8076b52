//! Plain-text rendering for the terminal front-end.
//!
//! Pure functions from conversation state to strings; the binary decides
//! where they go.

use std::fmt::Write;

use time::macros::format_description;

use crate::session::Connection;
use crate::state::ticker::{TOTAL_STEPS, progress_percent, thinking_step};
use crate::state::{Author, Message};

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

pub const SUGGESTED_QUESTIONS: [(&str, &str); 6] = [
    ("Nutrition", "What foods should I avoid during pregnancy?"),
    ("Health", "How much weight should I gain during pregnancy?"),
    ("Fitness", "What exercises are safe during pregnancy?"),
    ("Supplements", "When should I start taking prenatal vitamins?"),
    ("Labor", "What are the signs of labor?"),
    ("Symptoms", "How can I manage morning sickness?"),
];

pub const DISCLAIMER: &str =
    "AI-powered pregnancy health assistant. Always consult healthcare professionals for medical advice.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

#[must_use]
pub fn confidence_band(percent: u8) -> ConfidenceBand {
    match percent {
        70.. => ConfidenceBand::High,
        50..=69 => ConfidenceBand::Medium,
        _ => ConfidenceBand::Low,
    }
}

#[must_use]
pub fn render_message(msg: &Message) -> String {
    let who = match msg.author {
        Author::User => "You",
        Author::Assistant if msg.is_error => "Nuranest (error)",
        Author::Assistant => "Nuranest",
    };
    let clock = msg
        .created_at
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default();

    let mut out = format!("[{clock}] {who}:\n{}\n", msg.text);

    let mut meta = Vec::new();
    if let Some(secs) = msg.processing_time_secs {
        meta.push(format!("{secs:.1}s"));
    }
    if let Some(pct) = msg.confidence_percent() {
        let band = match confidence_band(pct) {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        };
        meta.push(format!("{pct}% confident ({band})"));
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "  {}", meta.join(" · "));
    }

    if !msg.sources.is_empty() {
        let _ = writeln!(out, "  Sources:");
        for (i, source) in msg.sources.iter().enumerate() {
            let _ = writeln!(out, "    {}. {source}", i + 1);
        }
    }
    out
}

/// The four-step "thinking" panel for the current step.
#[must_use]
pub fn render_thinking(current: u8) -> String {
    let mut out = String::from("AI Processing Steps\n");
    for step in (1..=TOTAL_STEPS).filter_map(thinking_step) {
        let marker = if current > step.number {
            "[x]"
        } else if current == step.number {
            "[>]"
        } else {
            "[ ]"
        };
        let _ = writeln!(out, "  {marker} {} - {}", step.title, step.description);
    }
    let _ = writeln!(
        out,
        "  Progress: {}% (Step {current} of {TOTAL_STEPS})",
        progress_percent(current)
    );
    out
}

#[must_use]
pub fn render_connection(connection: &Connection) -> String {
    match connection {
        Connection::Connected(info) => match &info.version {
            Some(version) => format!("● connected (api {version})"),
            None => "● connected".to_string(),
        },
        Connection::Disconnected(reason) => format!("○ disconnected: {reason}"),
    }
}

#[must_use]
pub fn render_suggestions() -> String {
    let mut out = String::from("Try asking:\n");
    for (i, (category, question)) in SUGGESTED_QUESTIONS.iter().enumerate() {
        let _ = writeln!(out, "  {}. [{category}] {question}", i + 1);
    }
    out
}

/// Resolve a 1-based suggestion number typed by the user.
#[must_use]
pub fn suggestion(input: &str) -> Option<&'static str> {
    let n: usize = input.trim().parse().ok()?;
    n.checked_sub(1)
        .and_then(|i| SUGGESTED_QUESTIONS.get(i))
        .map(|(_, q)| *q)
}

pub const HELP: &str = "\
Commands:
  /suggest   list starter questions (type a number to ask one)
  /clear     clear the conversation
  /health    re-check the connection
  /docs      show the API documentation URL
  /help      show this help
  /quit      exit";
