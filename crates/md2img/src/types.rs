//! Host-facing message types
//!
//! The pipeline only understands plain text and images. Every other component
//! kind the host sends through a chain is carried along untouched.
//!
//! # Examples
//!
//! ```ignore
//! use md2img::{MessageChain, MessageComponent};
//!
//! let chain = MessageChain::new()
//!     .message("# Release notes")
//!     .file_image("/tmp/md2img-x1y2.png");
//!
//! assert_eq!(chain.first_text(), Some("# Release notes"));
//! assert_eq!(chain.len(), 2);
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where an image component points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ImageSource {
    /// A file on the local filesystem
    File(PathBuf),
    /// A remote image
    Url(String),
}

/// One element of an outbound message chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessageComponent {
    /// Plain text, the only kind the pipeline converts
    Plain(String),

    /// An image
    Image(ImageSource),

    /// A mention of another user
    Mention(String),

    /// A reference to the message being replied to
    Reply(String),
}

impl MessageComponent {
    /// Text of a plain component
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text),
            _ => None,
        }
    }

    /// Path of a file image component
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::Image(ImageSource::File(path)) => Some(path),
            _ => None,
        }
    }
}

/// Ordered sequence of components sent as one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain {
    components: Vec<MessageComponent>,
}

impl MessageChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain-text component
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.components.push(MessageComponent::Plain(text.into()));
        self
    }

    /// Append an image component backed by a local file
    pub fn file_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.components
            .push(MessageComponent::Image(ImageSource::File(path.into())));
        self
    }

    /// Append an arbitrary component
    pub fn push(&mut self, component: MessageComponent) {
        self.components.push(component);
    }

    /// Text of the first plain component
    pub fn first_text(&self) -> Option<&str> {
        self.components.iter().find_map(MessageComponent::as_text)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageComponent> {
        self.components.iter()
    }

    pub fn components(&self) -> &[MessageComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Replace the whole chain
    pub(crate) fn replace(&mut self, components: Vec<MessageComponent>) {
        self.components = components;
    }
}

impl From<Vec<MessageComponent>> for MessageChain {
    fn from(components: Vec<MessageComponent>) -> Self {
        Self { components }
    }
}

impl FromIterator<MessageComponent> for MessageChain {
    fn from_iter<I: IntoIterator<Item = MessageComponent>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageChain {
    type Item = MessageComponent;
    type IntoIter = std::vec::IntoIter<MessageComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a MessageComponent;
    type IntoIter = std::slice::Iter<'a, MessageComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// A language-model response before it is delivered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub result_chain: MessageChain,
}

impl LlmResponse {
    pub fn new(result_chain: MessageChain) -> Self {
        Self { result_chain }
    }

    /// Convenience constructor for a single-text response
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MessageChain::new().message(text))
    }
}

/// The host event an interception runs against
///
/// `send` delivers a chain immediately. `stop_event` tells the host not to
/// deliver the original message and not to run later handlers.
#[async_trait]
pub trait MessageEvent: Send + Sync {
    /// Deliver a chain to the conversation the event came from
    async fn send(&self, chain: MessageChain) -> anyhow::Result<()>;

    /// Stop propagation of the current event
    fn stop_event(&self);

    /// Whether propagation was stopped
    fn is_stopped(&self) -> bool;
}

/// What an interception did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "converted", rename_all = "snake_case")]
pub enum InterceptOutcome {
    /// Not applicable or classified as not needing conversion
    Skipped,
    /// This many text components were delivered as images
    Converted(usize),
    /// Conversion was attempted and failed; the original text stands
    Failed,
}

impl InterceptOutcome {
    pub fn converted(&self) -> usize {
        match self {
            Self::Converted(n) => *n,
            _ => 0,
        }
    }
}
