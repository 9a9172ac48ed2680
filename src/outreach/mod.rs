//! Outreach generation: mock templates, remote completions, and the batch
//! pass that turns a [`LeadTable`](crate::leads::LeadTable) into an
//! [`OutreachTable`].

pub mod batch;
pub mod mock;
pub mod remote;

use std::borrow::Cow;

use thiserror::Error;

use crate::leads::{Lead, LeadField};
use crate::llm::ProviderError;

pub use batch::{BatchRunner, build_runner, run_outreach, run_outreach_with, select_rows};
pub use mock::synthesize_mock_message;
pub use remote::synthesize_remote_message;

/// Prefix of a failed row's rendered message.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Why a single row produced no message.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("remote generator unavailable: {0}")]
    Unavailable(String),
}

/// Per-row generation result.
#[derive(Debug)]
pub enum MessageOutcome {
    Generated(String),
    Failed(GenerationError),
}

impl MessageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, MessageOutcome::Failed(_))
    }

    /// The message text, or `"[ERROR] <description>"` for a failed row.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            MessageOutcome::Generated(text) => Cow::Borrowed(text.as_str()),
            MessageOutcome::Failed(err) => Cow::Owned(format!("{ERROR_MARKER} {err}")),
        }
    }
}

/// A retained lead and its generated message.
#[derive(Debug)]
pub struct OutreachResult {
    pub lead: Lead,
    pub message: MessageOutcome,
}

impl OutreachResult {
    pub fn outreach_message(&self) -> Cow<'_, str> {
        self.message.render()
    }
}

/// Batch output; `columns` mirrors the input table's recognised columns.
#[derive(Debug, Default)]
pub struct OutreachTable {
    pub columns: Vec<LeadField>,
    pub rows: Vec<OutreachResult>,
}

impl OutreachTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.message.is_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_renders_marker() {
        let outcome = MessageOutcome::Failed(ProviderError::Request("HTTP 401: bad key".into()).into());
        let text = outcome.render();
        assert!(text.starts_with("[ERROR] "));
        assert!(text.contains("HTTP 401: bad key"));
        assert!(outcome.is_failed());
    }

    #[test]
    fn generated_outcome_renders_verbatim() {
        let outcome = MessageOutcome::Generated("Hi Ada".into());
        assert_eq!(outcome.render(), "Hi Ada");
        assert!(!outcome.is_failed());
    }
}
