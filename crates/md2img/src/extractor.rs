//! Link and code extraction
//!
//! When a message is replaced by an image, links and code inside it can no longer
//! be clicked or copied. The extractor pulls them back out so they can be sent as
//! a plain-text follow-up.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConvertConfig;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s)]+").expect("valid url regex"));

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:(\w+)\n)?([\s\S]*?)```").expect("valid fence regex"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid inline code regex"));

/// Which categories to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Master switch; the sub-flags are inert without it
    pub enabled: bool,
    pub extract_links: bool,
    pub extract_code_blocks: bool,
    pub extract_inline_code: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::from(&ConvertConfig::default())
    }
}

impl From<&ConvertConfig> for ExtractionConfig {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            enabled: config.extract_links_and_code,
            extract_links: config.extract_links,
            extract_code_blocks: config.extract_code_blocks,
            extract_inline_code: config.extract_inline_code,
        }
    }
}

/// Content pulled out of a message
///
/// A category is `None` when it was disabled or had no matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub links: Option<Vec<String>>,
    pub code_blocks: Option<Vec<String>>,
    pub inline_codes: Option<Vec<String>>,
}

impl ExtractedContent {
    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.links.is_none() && self.code_blocks.is_none() && self.inline_codes.is_none()
    }
}

/// Stateless scanner for links and code
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor {
    config: ExtractionConfig,
}

impl PatternExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Whether extraction side messages are enabled at all
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Extract every enabled category from `text`
    pub fn extract(&self, text: &str) -> ExtractedContent {
        if !self.config.enabled {
            return ExtractedContent::default();
        }

        ExtractedContent {
            links: self
                .config
                .extract_links
                .then(|| extract_links(text))
                .filter(|v| !v.is_empty()),
            code_blocks: self
                .config
                .extract_code_blocks
                .then(|| extract_code_blocks(text))
                .filter(|v| !v.is_empty()),
            inline_codes: self
                .config
                .extract_inline_code
                .then(|| extract_inline_code(text))
                .filter(|v| !v.is_empty()),
        }
    }
}

/// Markdown links first, then bare URLs; the two passes are not interleaved
fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = MARKDOWN_LINK
        .captures_iter(text)
        .map(|caps| format!("{}: {}", &caps[1], &caps[2]))
        .collect();

    // A URL directly after `[` or `(` belongs to markdown syntax. On rejection
    // the search resumes one byte later so URLs nested inside it are still seen.
    let mut pos = 0;
    while let Some(m) = BARE_URL.find_at(text, pos) {
        let preceded_by_bracket = text[..m.start()]
            .as_bytes()
            .last()
            .is_some_and(|b| *b == b'[' || *b == b'(');
        if preceded_by_bracket {
            pos = m.start() + 1;
            continue;
        }
        links.push(m.as_str().to_string());
        pos = m.end();
    }

    links
}

fn extract_code_blocks(text: &str) -> Vec<String> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let lang = caps.get(1).map_or("text", |m| m.as_str());
            let code = caps.get(2).map_or("", |m| m.as_str()).trim();
            (!code.is_empty()).then(|| format!("```{}\n{}\n```", lang, code))
        })
        .collect()
}

fn extract_inline_code(text: &str) -> Vec<String> {
    INLINE_CODE
        .captures_iter(text)
        .map(|caps| format!("`{}`", &caps[1]))
        .collect()
}

/// Render extracted content as the follow-up message body
///
/// Returns `None` when there is nothing to send.
pub fn format_extracted(content: &ExtractedContent) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(links) = &content.links {
        parts.push("🔗 Links:".to_string());
        parts.extend(links.iter().map(|link| format!("  {}", link)));
    }

    if let Some(blocks) = &content.code_blocks {
        if !parts.is_empty() {
            parts.push(String::new());
        }
        parts.push("📝 Code blocks:".to_string());
        for (i, block) in blocks.iter().enumerate() {
            parts.push(format!("Code block {}:", i + 1));
            parts.push(block.clone());
            parts.push(String::new());
        }
    }

    if let Some(codes) = &content.inline_codes {
        if !parts.is_empty() {
            parts.push(String::new());
        }
        parts.push("💻 Inline code:".to_string());
        parts.push(codes.join(" "));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
