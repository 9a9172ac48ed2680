//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations; add a
//! variant + module in `providers/` for each additional backend. Calls are
//! blocking: the outreach batch is a sequential, single-threaded pass.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Completion seam ───────────────────────────────────────────────────────────

/// One prompt in, one trimmed text reply out.
///
/// Implemented by [`LlmProvider`]; the outreach batch is generic over it so
/// callers can substitute their own backend.
pub trait Complete {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        match self {
            LlmProvider::OpenAiCompatible(p) => p.model(),
        }
    }

    /// Model ids the backend reports, in the order it returns them.
    pub fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        match self {
            LlmProvider::OpenAiCompatible(p) => p.list_models(),
        }
    }
}

impl Complete for LlmProvider {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::OpenAiCompatible(p) => p.complete(prompt),
        }
    }
}
