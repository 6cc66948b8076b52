//! Nuranest chat client.
//!
//! DESIGN
//! ======
//! `api` talks to the Q&A backend, `state` holds the conversation and its
//! single-flight request state machine, `session` wires them together on
//! tokio, and `render` turns state into terminal text. `repl` is the
//! line-oriented loop the binary in `main.rs` runs; nothing below it
//! depends on a terminal.

pub mod api;
pub mod config;
pub mod render;
pub mod repl;
pub mod session;
pub mod state;
