//! Client-side conversation state.
//!
//! DESIGN
//! ======
//! Split by concern so each piece is testable alone: `message` is the
//! immutable record, `store` the single-flight state machine, `ticker` the
//! cosmetic progress timer.

pub mod message;
pub mod store;
pub mod ticker;

pub use message::{Author, Message, MessageId};
pub use store::{Action, ConversationStore, IgnoreReason, Phase, RequestState, Transition};
pub use ticker::{ProgressTicker, THINKING_STEPS, TOTAL_STEPS, ThinkingStep};
