//! Remote message synthesis through a chat-completion backend.

use crate::llm::{Complete, ProviderError};

/// Instruction sent for one lead. Deterministic for identical inputs.
///
/// The requested length is a fixed 70–85 words; the caller's word limit is
/// not forwarded to the model.
pub fn build_prompt(name: &str, company: &str, role: &str) -> String {
    format!(
        "You are an expert B2B outreach copywriter.\n\
         Write a short LinkedIn DM to {name}, the {role} at {company}.\n\
         Offer help with AI-powered lead generation & outreach automation \
         (Python + AI workflows). One concrete benefit. Warm, 70-85 words. \
         No emojis. End with a single-line CTA signed —Karm."
    )
}

/// Ask `provider` for a message to this lead. Any transport, auth or
/// response-shape failure comes back as `Err`.
pub fn synthesize_remote_message<P: Complete + ?Sized>(
    provider: &P,
    name: &str,
    company: &str,
    role: &str,
    _word_limit: usize,
) -> Result<String, ProviderError> {
    let prompt = build_prompt(name, company, role);
    let text = provider.complete(&prompt)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        prompts: RefCell<Vec<String>>,
        reply: &'static str,
    }

    impl Complete for Recording {
        fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    struct Failing;

    impl Complete for Failing {
        fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::Request("HTTP 429: quota exceeded".into()))
        }
    }

    #[test]
    fn prompt_embeds_lead_fields() {
        let prompt = build_prompt("Ada", "Analytical Engines", "CTO");
        assert!(prompt.contains("to Ada, the CTO at Analytical Engines."));
        assert!(prompt.contains("70-85 words"));
        assert!(prompt.contains("No emojis"));
        assert_eq!(prompt, build_prompt("Ada", "Analytical Engines", "CTO"));
    }

    #[test]
    fn reply_is_trimmed() {
        let provider = Recording { prompts: RefCell::new(Vec::new()), reply: "\n  Hi Ada!  " };
        let msg = synthesize_remote_message(&provider, "Ada", "AE", "CTO", 75).unwrap();
        assert_eq!(msg, "Hi Ada!");
        assert_eq!(provider.prompts.borrow().len(), 1);
    }

    #[test]
    fn provider_failure_propagates() {
        let err = synthesize_remote_message(&Failing, "Ada", "AE", "CTO", 75).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
