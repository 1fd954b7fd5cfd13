//! Typed views of the mode strings found in configuration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strategy used to decide whether a message is converted automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoConvertMode {
    /// Never convert automatically
    Disabled,
    /// Convert when the text is longer than the configured limit
    Length,
    /// Convert when the configured pattern matches
    Pattern,
    /// Pattern first, length as a fallback
    Combined,
    /// A mode string nobody recognizes; never converts
    Unrecognized(String),
}

impl AutoConvertMode {
    /// Parse a mode string from configuration
    ///
    /// `regex` is accepted as the historical name of the pattern mode.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Self::Disabled,
            "length" => Self::Length,
            "regex" | "pattern" => Self::Pattern,
            "combined" | "both" => Self::Combined,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Whether this mode needs a compiled pattern
    pub fn uses_pattern(&self) -> bool {
        matches!(self, Self::Pattern | Self::Combined)
    }

    /// Whether this mode consults the length limit
    pub fn uses_length(&self) -> bool {
        matches!(self, Self::Length | Self::Combined)
    }
}

impl fmt::Display for AutoConvertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Length => write!(f, "length"),
            Self::Pattern => write!(f, "regex"),
            Self::Combined => write!(f, "combined"),
            Self::Unrecognized(raw) => write!(f, "unrecognized({})", raw),
        }
    }
}

/// Hook point that performs automatic conversion
///
/// The explicit command is active regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterceptMode {
    /// Rewrite outbound chains right before they are sent
    #[default]
    PreSend,
    /// Intercept LLM responses and send the image directly
    LlmResponse,
}

impl InterceptMode {
    /// Parse an intercept mode string
    ///
    /// Returns `None` for unknown values so the caller can warn and fall back.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pre_send" | "presend" | "pre-send" | "decorating_result" => Some(Self::PreSend),
            "llm" | "llm_response" | "llm-response" | "on_llm_response" => Some(Self::LlmResponse),
            _ => None,
        }
    }
}

impl fmt::Display for InterceptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreSend => write!(f, "pre_send"),
            Self::LlmResponse => write!(f, "llm"),
        }
    }
}
