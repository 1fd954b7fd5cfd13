//! Error types for the markdown-to-image pipeline
//!
//! Every failure in the render → save pipeline is represented here. Entry points
//! in the orchestrator catch these errors and turn them into a single user-facing
//! message, so none of them ever reaches the host framework.
//!
//! # Error Handling Patterns
//!
//! 1. **Configuration errors**: An invalid pattern source is logged and the
//!    pattern-based classification degrades; construction never fails.
//!
//! 2. **Render errors**: A missing renderer or a renderer failure is reported to
//!    the user through the same channel the image would have used.
//!
//! 3. **Deletion errors**: Temp-file removal failures are swallowed. They exist
//!    as a variant only so internal helpers can return `Result`.
//!
//! # Examples
//!
//! ```ignore
//! match gateway.render(text).await {
//!     Ok(handle) => artifacts.persist(handle).await?,
//!     Err(Md2ImgError::RenderUnavailable) => eprintln!("no renderer installed"),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while classifying, rendering or persisting a message
#[derive(Debug, Error)]
pub enum Md2ImgError {
    /// Invalid configuration value
    ///
    /// Raised while parsing configuration documents. Invalid values inside an
    /// otherwise well-formed document degrade features instead.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The configured classification pattern did not compile
    #[error("Invalid classification pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// No rendering collaborator is installed
    #[error("Markdown renderer is not available")]
    RenderUnavailable,

    /// The rendering collaborator failed while converting text
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// The rendered handle could not be written to disk
    ///
    /// Common causes:
    /// - The handle exposes neither a direct nor an embedded savable image
    /// - The image encoder failed
    /// - The artifact directory is not writable
    #[error("Failed to save image: {0}")]
    SaveFailed(String),

    /// A temp file could not be removed
    ///
    /// Never surfaced to users and never logged above debug level.
    #[error("Failed to delete artifact: {0}")]
    DeletionFailed(String),

    /// The host messaging framework rejected a send
    #[error("Host error: {0}")]
    HostError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Md2ImgError {
    /// Text sent back to the user when an entry point fails
    pub fn user_message(&self) -> String {
        format!("Conversion failed: {}", self)
    }
}

/// Result type for md2img operations
pub type Result<T> = std::result::Result<T, Md2ImgError>;
