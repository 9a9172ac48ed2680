//! LLM provider implementations.
//!
//! `build(settings, model, api_key)` is the factory, called once per run
//! when the batch is going to use the API path.

pub mod openai_compatible;

use crate::config::LlmSettings;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from `[llm]` settings, the run's model and key.
/// An empty key sends no `Authorization` header.
pub fn build(settings: &LlmSettings, model: &str, api_key: &str) -> Result<LlmProvider, ProviderError> {
    let p = openai_compatible::OpenAiCompatibleProvider::new(
        settings.api_base_url.clone(),
        model.to_string(),
        settings.temperature,
        settings.timeout_seconds,
        Some(api_key.to_string()).filter(|k| !k.is_empty()),
    )?;
    Ok(LlmProvider::OpenAiCompatible(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn builds_openai_provider_with_model() {
        let settings = Settings::default();
        let p = build(&settings.llm, "gpt-4o-mini", "sk-test").unwrap();
        assert_eq!(p.model(), "gpt-4o-mini");
    }

    #[test]
    fn local_endpoint_builds_without_key() {
        let mut settings = Settings::default().llm;
        settings.api_base_url = "http://localhost:11434/v1/chat/completions".into();
        let p = build(&settings, "llama3", "").unwrap();
        assert_eq!(p.model(), "llama3");
    }
}
