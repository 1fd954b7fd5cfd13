//! Rendering collaborator interfaces
//!
//! Markdown layout is not done here. A host installs a [`MarkdownRenderer`] and
//! this module adapts it: it chooses between a custom style and the default
//! conversion path, runs blocking work off the scheduler, and resolves whatever
//! the renderer returns into a savable [`ImageHandle`].
//!
//! # Implementing a renderer
//!
//! ```ignore
//! struct MyRenderer;
//!
//! #[async_trait]
//! impl MarkdownRenderer for MyRenderer {
//!     fn load_style(&self, dir: &Path) -> anyhow::Result<Arc<dyn MarkdownStyle>> {
//!         Ok(Arc::new(MyStyle::load(dir)?))
//!     }
//!
//!     async fn default_convert(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>> {
//!         let image: image::RgbaImage = layout(text).await?;
//!         Ok(Box::new(image))
//!     }
//! }
//! ```

pub mod gateway;
pub mod handle;

pub use gateway::RenderGateway;
pub use handle::{ImageHandle, RenderedImage, SavableImage};

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// External markdown rendering engine
#[async_trait]
pub trait MarkdownRenderer: Send + Sync {
    /// Load a custom style from a directory
    ///
    /// Blocking; called once at startup on the blocking pool.
    fn load_style(&self, dir: &Path) -> anyhow::Result<Arc<dyn MarkdownStyle>>;

    /// Convert markdown with the built-in style
    async fn default_convert(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>>;

    /// Renderer name for logs
    fn name(&self) -> &str {
        "markdown-renderer"
    }
}

/// A loaded custom style
pub trait MarkdownStyle: Send + Sync {
    /// Render markdown with this style
    ///
    /// Blocking; always invoked through `spawn_blocking`.
    fn render(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>>;
}
