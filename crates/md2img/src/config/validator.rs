//! Startup validation of plugin configuration
//!
//! Validation never rejects a configuration. Every problem degrades a feature
//! at runtime, so the validator only reports what will degrade.

use std::fmt;

use super::loader::ConvertConfig;
use super::mode::{AutoConvertMode, InterceptMode};
use crate::classifier::compile_pattern;

/// A configuration value that will make some feature inert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Auto-convert mode string is not recognized
    UnknownConvertMode(String),
    /// Intercept mode string is not recognized
    UnknownInterceptMode(String),
    /// A length-based mode is active with a non-positive limit
    LengthLimitDisabled(i64),
    /// A pattern-based mode is active with an empty pattern
    EmptyPattern,
    /// Pattern does not compile
    InvalidPattern(String),
    /// Sub-flags are set but the extraction master switch is off
    ExtractionFlagsInert,
    /// Artifacts are deleted as soon as they are created
    ZeroTtl,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownConvertMode(raw) => {
                write!(f, "unknown auto_convert_mode '{}', auto conversion disabled", raw)
            }
            Self::UnknownInterceptMode(raw) => {
                write!(f, "unknown intercept_mode '{}', using pre_send", raw)
            }
            Self::LengthLimitDisabled(limit) => {
                write!(f, "length_limit {} disables length-based conversion", limit)
            }
            Self::EmptyPattern => write!(f, "pattern is empty, pattern-based conversion disabled"),
            Self::InvalidPattern(e) => {
                write!(f, "pattern does not compile ({}), pattern-based conversion disabled", e)
            }
            Self::ExtractionFlagsInert => {
                write!(f, "extraction sub-flags are set but extract_links_and_code is off")
            }
            Self::ZeroTtl => write!(f, "artifact_ttl_seconds is 0, images may vanish before delivery"),
        }
    }
}

/// Validates plugin configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Collect every warning for a configuration
    pub fn validate(config: &ConvertConfig) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mode = config.auto_convert_mode();

        if let AutoConvertMode::Unrecognized(raw) = &mode {
            warnings.push(ConfigWarning::UnknownConvertMode(raw.clone()));
        }

        if InterceptMode::parse(&config.intercept_mode).is_none() {
            warnings.push(ConfigWarning::UnknownInterceptMode(
                config.intercept_mode.clone(),
            ));
        }

        if mode.uses_length() && config.length_limit <= 0 {
            warnings.push(ConfigWarning::LengthLimitDisabled(config.length_limit));
        }

        if mode.uses_pattern() {
            if config.pattern.is_empty() {
                warnings.push(ConfigWarning::EmptyPattern);
            } else if let Err(e) = compile_pattern(&config.pattern) {
                warnings.push(ConfigWarning::InvalidPattern(e.to_string()));
            }
        }

        // links and code blocks default to on, so only the inline flag signals intent
        if !config.extract_links_and_code && config.extract_inline_code {
            warnings.push(ConfigWarning::ExtractionFlagsInert);
        }

        if config.artifact_ttl_seconds == 0 {
            warnings.push(ConfigWarning::ZeroTtl);
        }

        warnings
    }
}
