//! Progress ticker — cosmetic "thinking" steps shown while a question is
//! outstanding.
//!
//! DESIGN
//! ======
//! The backend reports no partial progress, so the ticker advances on a
//! fixed timer: step 1 at once, then one step per interval up to step 4.
//! It never looks at the real request. The consumer's callback returns
//! `false` once the step is no longer wanted (answer arrived, chat cleared),
//! which stops the task; dropping or cancelling the ticker aborts it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[cfg(test)]
#[path = "ticker_test.rs"]
mod ticker_test;

pub const TOTAL_STEPS: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThinkingStep {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const THINKING_STEPS: [ThinkingStep; TOTAL_STEPS as usize] = [
    ThinkingStep {
        number: 1,
        title: "Analyzing Question",
        description: "Understanding your pregnancy health question",
    },
    ThinkingStep {
        number: 2,
        title: "Searching Knowledge Base",
        description: "Finding relevant medical information",
    },
    ThinkingStep {
        number: 3,
        title: "Processing Information",
        description: "Analyzing evidence-based data",
    },
    ThinkingStep {
        number: 4,
        title: "Generating Response",
        description: "Creating personalized answer",
    },
];

/// Catalogue entry for a 1-based step number.
#[must_use]
pub fn thinking_step(step: u8) -> Option<&'static ThinkingStep> {
    step.checked_sub(1)
        .and_then(|i| THINKING_STEPS.get(usize::from(i)))
}

#[must_use]
pub fn progress_percent(step: u8) -> u8 {
    let pct = u16::from(step.min(TOTAL_STEPS)) * 100 / u16::from(TOTAL_STEPS);
    u8::try_from(pct).unwrap_or(100)
}

pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Emit step 1 synchronously, then spawn a task emitting steps
    /// 2..=`TOTAL_STEPS` every `interval`. Must be called inside a tokio
    /// runtime.
    pub fn start<F>(interval: Duration, mut on_step: F) -> Self
    where
        F: FnMut(u8) -> bool + Send + 'static,
    {
        if !on_step(1) {
            debug!("ticker: first step refused");
            return Self { handle: None };
        }

        let handle = tokio::spawn(async move {
            for step in 2..=TOTAL_STEPS {
                tokio::time::sleep(interval).await;
                if !on_step(step) {
                    debug!(step, "ticker: step suppressed, stopping");
                    return;
                }
            }
        });
        Self { handle: Some(handle) }
    }

    /// Abort pending steps. Idempotent.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
