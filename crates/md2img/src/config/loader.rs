//! Plugin configuration and its loaders
//!
//! The host hands the plugin a flat key/value document. Keys mirror the host
//! plugin schema, including the historical aliases `md2img_len_limit` and
//! `regex_pattern`. Every key is optional; missing keys take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::mode::{AutoConvertMode, InterceptMode};
use crate::classifier::DEFAULT_PATTERN;
use crate::error::{Md2ImgError, Result};

/// Raw plugin configuration as supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Directory holding a custom render style (empty = default style)
    pub style_path: String,

    /// Auto-convert strategy: `disabled`, `length`, `regex`, `combined`
    pub auto_convert_mode: String,

    /// Character count above which text is converted
    #[serde(alias = "md2img_len_limit")]
    pub length_limit: i64,

    /// Pattern source for the pattern-based modes
    #[serde(alias = "regex_pattern")]
    pub pattern: String,

    /// Master switch for link/code extraction side messages
    pub extract_links_and_code: bool,

    /// Extract markdown and bare links
    pub extract_links: bool,

    /// Extract fenced code blocks
    pub extract_code_blocks: bool,

    /// Extract inline code spans
    pub extract_inline_code: bool,

    /// Hook performing auto-conversion: `pre_send` or `llm`
    pub intercept_mode: String,

    /// Seconds before a rendered temp file is deleted
    pub artifact_ttl_seconds: u64,

    /// Command token for explicit conversion
    pub command_name: String,

    /// Directory for rendered PNGs (system temp dir when unset)
    pub artifact_dir: Option<PathBuf>,

    /// Upper bound on how long shutdown waits for pending deletions
    pub shutdown_grace_ms: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            style_path: String::new(),
            auto_convert_mode: "length".to_string(),
            length_limit: 100,
            pattern: DEFAULT_PATTERN.to_string(),
            extract_links_and_code: false,
            extract_links: true,
            extract_code_blocks: true,
            extract_inline_code: false,
            intercept_mode: "pre_send".to_string(),
            artifact_ttl_seconds: 180,
            command_name: "md2img".to_string(),
            artifact_dir: None,
            shutdown_grace_ms: 2000,
        }
    }
}

impl ConvertConfig {
    /// Parse configuration from YAML
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    ///
    /// A missing file is not an error; the defaults are returned instead.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Md2ImgError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build configuration from a host-supplied JSON object
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let config = serde_json::from_value(value)?;
        Ok(config)
    }

    /// Parsed auto-convert mode
    pub fn auto_convert_mode(&self) -> AutoConvertMode {
        AutoConvertMode::parse(&self.auto_convert_mode)
    }

    /// Parsed intercept mode, falling back to pre-send for unknown values
    pub fn intercept_mode(&self) -> InterceptMode {
        InterceptMode::parse(&self.intercept_mode).unwrap_or_else(|| {
            warn!(
                intercept_mode = %self.intercept_mode,
                "Unknown intercept mode, falling back to pre_send"
            );
            InterceptMode::PreSend
        })
    }

    /// Length limit clamped to zero
    pub fn length_threshold(&self) -> u64 {
        self.length_limit.max(0) as u64
    }

    /// Custom style directory, if one is configured
    pub fn style_dir(&self) -> Option<PathBuf> {
        let trimmed = self.style_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    /// Delay before a rendered artifact is deleted
    pub fn artifact_ttl(&self) -> Duration {
        Duration::from_secs(self.artifact_ttl_seconds)
    }

    /// Grace period for pending deletions at shutdown
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
