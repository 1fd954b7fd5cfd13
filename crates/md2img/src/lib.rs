//! md2img: Markdown-to-Image Interception
//!
//! Turns markdown-heavy chat replies into rendered images so they display
//! properly on platforms without markdown support.
//!
//! # Overview
//!
//! The crate sits between a chat framework and a markdown rendering library. It
//! decides which outgoing text should become an image, asks the renderer for one,
//! saves it to a temporary PNG and swaps it into the outgoing message. Links and
//! code that would become unclickable can optionally be re-sent as plain text.
//!
//! # Architecture
//!
//! 1. **Classification** (`classifier`): length, pattern or combined heuristics
//! 2. **Extraction** (`extractor`): links, fenced blocks and inline code
//! 3. **Sanitizing** (`sanitizer`): fence whitespace normalization before render
//! 4. **Rendering** (`render`): adapter over the host-installed renderer
//! 5. **Artifacts** (`artifacts`): temp file registry and delayed deletion
//! 6. **Orchestration** (`orchestrator`): command, pre-send and LLM-response entry points
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use md2img::{ConvertConfig, InterceptionOrchestrator, MessageChain};
//!
//! let config = ConvertConfig::from_file(Path::new("md2img.yaml"))?;
//! let orchestrator = InterceptionOrchestrator::start(config, Some(Arc::new(MyRenderer))).await;
//!
//! // Before the host sends a reply
//! let mut chain = MessageChain::new().message(reply_text);
//! orchestrator.on_decorating_result(&event, &mut chain).await;
//!
//! // On plugin unload
//! orchestrator.terminate().await;
//! ```
//!
//! # Configuration
//!
//! ```yaml
//! auto_convert_mode: "combined"
//! length_limit: 200
//! intercept_mode: "pre_send"
//! extract_links_and_code: true
//! artifact_ttl_seconds: 180
//! ```
//!
//! # Error Handling
//!
//! Fallible internals return `Result<T>`, an alias for
//! `std::result::Result<T, Md2ImgError>`. Entry points never return errors; they
//! log them and answer the user with a single failure message.
//!
//! # Logging
//!
//! All components log through `tracing`. Installing a subscriber is left to the
//! host.

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod render;
pub mod sanitizer;
pub mod types;

// Re-export public types
pub use artifacts::{ArtifactLifecycleManager, RenderedArtifact};
pub use classifier::{compile_pattern, ClassificationConfig, ClassificationEngine, DEFAULT_PATTERN};
pub use config::{AutoConvertMode, ConfigValidator, ConfigWarning, ConvertConfig, InterceptMode};
pub use context::ConversionContext;
pub use error::{Md2ImgError, Result};
pub use extractor::{format_extracted, ExtractedContent, ExtractionConfig, PatternExtractor};
pub use orchestrator::{InterceptionOrchestrator, EMPTY_COMMAND_REPLY};
pub use render::{
    ImageHandle, MarkdownRenderer, MarkdownStyle, RenderGateway, RenderedImage, SavableImage,
};
pub use sanitizer::TextSanitizer;
pub use types::{
    ImageSource, InterceptOutcome, LlmResponse, MessageChain, MessageComponent, MessageEvent,
};
