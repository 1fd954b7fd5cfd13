//! Fenced-code normalization applied before rendering

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCED_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)```(?:\s*\n?)([\s\S]*?)(?:\n?\s*)```(\s*)").expect("valid fence regex")
});

/// Normalizes whitespace around fenced code blocks
pub struct TextSanitizer;

impl TextSanitizer {
    /// Rewrite every fenced region to `\n```\n<content>\n```\n` and trim the result
    ///
    /// Blank lines hugging a fence are absorbed into the rewrite, so the output is
    /// a fixed point: cleaning it again changes nothing.
    pub fn clean(text: &str) -> String {
        let rewritten = FENCED_REGION.replace_all(text, |caps: &Captures<'_>| {
            format!("\n```\n{}\n```\n", &caps[2])
        });
        rewritten.trim().to_string()
    }
}
