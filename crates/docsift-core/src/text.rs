//! Text cleanup and word-based token estimation.
//!
//! Documents arrive as OCR or extracted plain text littered with currency
//! signs, markup remnants, and separator characters that carry no signal
//! for scoring or matching. Cleanup strips those before any word-level
//! processing, and token estimation works from word counts rather than a
//! model tokenizer: the reduce/pass-through decision only needs a rough
//! figure, not an exact encoding.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::TOKENS_PER_WORD;

static NOISE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£¥¢%&*+=<>^|~@#\\_\[\]{}]").expect("valid noise pattern"));

/// Strip symbol characters that carry no signal for scoring or matching.
pub fn clean_up(text: &str) -> String {
    NOISE_CHARS.replace_all(text, "").into_owned()
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate the token count a language model would see for `word_count`
/// words. English prose averages ~1.3 tokens per word.
pub fn estimate_tokens_from_words(word_count: usize) -> usize {
    (word_count as f64 * TOKENS_PER_WORD).round() as usize
}
