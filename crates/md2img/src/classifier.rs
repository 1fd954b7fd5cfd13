//! Auto-convert classification
//!
//! Decides whether a piece of outgoing text should be replaced by a rendered
//! image. The decision is a pure function of the immutable configuration and the
//! text.

use regex::{Regex, RegexBuilder};
use tracing::{debug, error};

use crate::config::{AutoConvertMode, ConvertConfig};
use crate::error::Result;

/// Built-in markdown heuristic: fenced code, math, headings, quotes, lists,
/// tables, links, images and horizontal rules.
pub const DEFAULT_PATTERN: &str = r"```[\s\S]*?```|\$\$[\s\S]*?\$\$|\$[^$\n]+\$|^#{1,6}\s+.+$|^>\s+.+$|^\s*[-*+]\s+.+$|^\s*\d+\.\s+.+$|\|[^\n]*\||\[.+?\]\(.+?\)|!\[.*?\]\(.+?\)|^\s*---+\s*$|^\s*\*\*\*+\s*$";

/// Compile a classification pattern
///
/// `.` matches newlines and `^`/`$` anchor at line boundaries.
pub fn compile_pattern(source: &str) -> Result<Regex> {
    let regex = RegexBuilder::new(source)
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()?;
    Ok(regex)
}

/// Immutable classification settings
#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    /// Active strategy
    pub mode: AutoConvertMode,
    /// Character count above which text converts (0 disables)
    pub length_threshold: u64,
    /// Present iff the mode uses a pattern and the source compiled
    pub compiled_pattern: Option<Regex>,
}

impl ClassificationConfig {
    /// Build from plugin configuration
    ///
    /// A pattern that fails to compile is logged and left out; the pattern modes
    /// then degrade instead of failing construction.
    pub fn from_config(config: &ConvertConfig) -> Self {
        let mode = config.auto_convert_mode();
        let compiled_pattern = if mode.uses_pattern() && !config.pattern.is_empty() {
            match compile_pattern(&config.pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    error!(error = %e, "Failed to compile classification pattern");
                    None
                }
            }
        } else {
            None
        };

        Self {
            mode,
            length_threshold: config.length_threshold(),
            compiled_pattern,
        }
    }
}

/// Answers "should this text become an image?"
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    config: ClassificationConfig,
}

impl ClassificationEngine {
    /// Create an engine from classification settings
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    /// Create an engine straight from plugin configuration
    pub fn from_config(config: &ConvertConfig) -> Self {
        Self::new(ClassificationConfig::from_config(config))
    }

    /// Active settings
    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Decide whether `text` should be converted
    pub fn should_convert(&self, text: &str) -> bool {
        let decision = match &self.config.mode {
            AutoConvertMode::Disabled => false,
            AutoConvertMode::Length => self.exceeds_length(text),
            AutoConvertMode::Pattern => self.matches_pattern(text),
            AutoConvertMode::Combined => self.matches_pattern(text) || self.exceeds_length(text),
            AutoConvertMode::Unrecognized(_) => false,
        };

        debug!(mode = %self.config.mode, decision, "Classified text");
        decision
    }

    fn exceeds_length(&self, text: &str) -> bool {
        let limit = self.config.length_threshold;
        limit > 0 && text.chars().count() as u64 > limit
    }

    fn matches_pattern(&self, text: &str) -> bool {
        self.config
            .compiled_pattern
            .as_ref()
            .is_some_and(|regex| regex.is_match(text))
    }
}
