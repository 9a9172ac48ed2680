//! Free, local message synthesis from fixed phrase pools.
//!
//! Randomness comes from the caller's RNG so runs can be seeded.

use rand::{Rng, seq::SliceRandom};

pub const OPENERS: [&str; 4] = [
    "Quick idea",
    "Noticed something you’ll like",
    "Fast win for your team",
    "Worth a peek",
];

pub const BENEFITS: [&str; 4] = [
    "replace manual list-building & cold emails",
    "boost reply rates with tailored first lines",
    "free your team from repetitive outreach tasks",
    "A/B test at scale with one click",
];

pub const CTAS: [&str; 4] = [
    "Worth a 5-min look?",
    "Open to a 10-min walk-through?",
    "Shall I send a 3-slide mini-demo?",
    "Happy to show a quick preview?",
];

pub const VALUE_LINE: &str = "We can personalize at scale and keep it on-brand.";
pub const SIGNATURE: &str = "—Karm";
pub const ELLIPSIS: &str = "…";

/// Assemble a templated message and cap it at `word_limit` tokens.
///
/// `role` is accepted for parity with the remote generator; the template
/// does not use it yet.
pub fn synthesize_mock_message<R: Rng + ?Sized>(
    rng: &mut R,
    name: &str,
    company: &str,
    _role: &str,
    word_limit: usize,
) -> String {
    let opener = OPENERS.choose(rng).copied().unwrap_or(OPENERS[0]);
    let benefit = BENEFITS.choose(rng).copied().unwrap_or(BENEFITS[0]);
    let cta = CTAS.choose(rng).copied().unwrap_or(CTAS[0]);

    let base = format!(
        "Hi {name}, {opener} for {company}. \
         I build Python + AI outreach automations that {benefit}. \
         {VALUE_LINE} {cta}\n{SIGNATURE}"
    );
    truncate_words(base, word_limit)
}

/// Keep the first `limit` whitespace tokens, joined by single spaces, and
/// append an ellipsis. Text within the limit is returned untouched.
pub fn truncate_words(text: String, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text;
    }
    let mut out = words[..limit].join(" ");
    out.push_str(ELLIPSIS);
    out
}
