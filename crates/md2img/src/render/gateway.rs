//! Adapter between the pipeline and the rendering collaborator

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{ImageHandle, MarkdownRenderer, MarkdownStyle};
use crate::error::{Md2ImgError, Result};
use crate::sanitizer::TextSanitizer;

/// Routes render requests to a custom style or the renderer's default path
///
/// The style is loaded once at startup. A missing directory or a load failure
/// leaves the gateway on the default path for the rest of the process.
pub struct RenderGateway {
    renderer: Option<Arc<dyn MarkdownRenderer>>,
    style: Option<Arc<dyn MarkdownStyle>>,
}

impl RenderGateway {
    /// Create a gateway; `None` means no renderer is installed
    pub fn new(renderer: Option<Arc<dyn MarkdownRenderer>>) -> Self {
        Self {
            renderer,
            style: None,
        }
    }

    /// Whether a renderer is installed
    pub fn is_available(&self) -> bool {
        self.renderer.is_some()
    }

    /// Whether renders go through a custom style
    pub fn has_custom_style(&self) -> bool {
        self.style.is_some()
    }

    /// Load the custom style from `dir`
    ///
    /// Never fails: every problem is logged and the default path stays active.
    pub async fn load_style(&mut self, dir: Option<&Path>) {
        let Some(renderer) = self.renderer.clone() else {
            error!("Markdown renderer is not installed, conversions will fail");
            return;
        };

        let Some(dir) = dir else {
            info!(renderer = renderer.name(), "No custom style configured, using default style");
            return;
        };

        if !dir.exists() {
            warn!(path = %dir.display(), "Style path does not exist, using default style");
            return;
        }

        let load_dir = dir.to_path_buf();
        match tokio::task::spawn_blocking(move || renderer.load_style(&load_dir)).await {
            Ok(Ok(style)) => {
                info!(path = %dir.display(), "Loaded custom style");
                self.style = Some(style);
            }
            Ok(Err(e)) => {
                let reason = format!("{:#}", e);
                warn!(path = %dir.display(), error = %reason, "Failed to load style, using default style");
            }
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Style loading task failed, using default style");
            }
        }
    }

    /// Clean `text` and render it
    ///
    /// Style renders are blocking and run on the blocking pool; the default
    /// path is awaited directly.
    pub async fn render(&self, text: &str) -> Result<ImageHandle> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(Md2ImgError::RenderUnavailable)?;
        let cleaned = TextSanitizer::clean(text);

        let output = match &self.style {
            Some(style) => {
                let style = Arc::clone(style);
                debug!(chars = cleaned.len(), "Rendering with custom style");
                tokio::task::spawn_blocking(move || style.render(&cleaned))
                    .await
                    .map_err(|e| Md2ImgError::RenderFailed(format!("render task failed: {}", e)))?
                    .map_err(|e| Md2ImgError::RenderFailed(format!("{:#}", e)))?
            }
            None => {
                debug!(chars = cleaned.len(), "Rendering with default style");
                renderer
                    .default_convert(&cleaned)
                    .await
                    .map_err(|e| Md2ImgError::RenderFailed(format!("{:#}", e)))?
            }
        };

        ImageHandle::resolve(output)
    }
}

impl fmt::Debug for RenderGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderGateway")
            .field("available", &self.is_available())
            .field("custom_style", &self.has_custom_style())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use image::RgbaImage;

    use super::*;
    use crate::render::RenderedImage;

    #[derive(Default)]
    struct Recorder {
        default_calls: Mutex<Vec<String>>,
        style_calls: Arc<Mutex<Vec<String>>>,
        fail_style_load: bool,
        fail_render: bool,
    }

    struct RecordingStyle {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MarkdownStyle for RecordingStyle {
        fn render(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(Box::new(RgbaImage::new(1, 1)))
        }
    }

    #[async_trait]
    impl MarkdownRenderer for Recorder {
        fn load_style(&self, _dir: &Path) -> anyhow::Result<Arc<dyn MarkdownStyle>> {
            if self.fail_style_load {
                anyhow::bail!("style.yml is malformed");
            }
            Ok(Arc::new(RecordingStyle {
                calls: Arc::clone(&self.style_calls),
            }))
        }

        async fn default_convert(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>> {
            if self.fail_render {
                anyhow::bail!("font not found");
            }
            self.default_calls.lock().unwrap().push(text.to_string());
            Ok(Box::new(RgbaImage::new(1, 1)))
        }
    }

    #[tokio::test]
    async fn test_render_without_renderer() {
        let gateway = RenderGateway::new(None);
        let result = gateway.render("# hi").await;
        assert!(matches!(result, Err(Md2ImgError::RenderUnavailable)));
    }

    #[tokio::test]
    async fn test_render_default_path_cleans_text() {
        let renderer = Arc::new(Recorder::default());
        let gateway = RenderGateway::new(Some(renderer.clone()));

        let handle = gateway.render("  text\n\n```\ncode\n```\n\n").await.unwrap();

        assert_eq!(handle.kind(), "direct");
        let calls = renderer.default_calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["text\n```\ncode\n```"]);
    }

    #[tokio::test]
    async fn test_render_failure_is_mapped() {
        let renderer = Arc::new(Recorder {
            fail_render: true,
            ..Default::default()
        });
        let gateway = RenderGateway::new(Some(renderer));

        let err = gateway.render("text").await.unwrap_err();
        assert!(matches!(err, Md2ImgError::RenderFailed(ref msg) if msg.contains("font not found")));
    }

    #[tokio::test]
    async fn test_style_loaded_and_used() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(Recorder::default());
        let mut gateway = RenderGateway::new(Some(renderer.clone()));

        gateway.load_style(Some(dir.path())).await;
        assert!(gateway.has_custom_style());

        gateway.render("styled").await.unwrap();
        assert_eq!(renderer.style_calls.lock().unwrap().as_slice(), ["styled"]);
        assert!(renderer.default_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_style_dir_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(Recorder::default());
        let mut gateway = RenderGateway::new(Some(renderer.clone()));

        gateway.load_style(Some(&dir.path().join("nope"))).await;
        assert!(!gateway.has_custom_style());

        gateway.render("plain").await.unwrap();
        assert_eq!(renderer.default_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_style_load_error_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(Recorder {
            fail_style_load: true,
            ..Default::default()
        });
        let mut gateway = RenderGateway::new(Some(renderer));

        gateway.load_style(Some(dir.path())).await;
        assert!(!gateway.has_custom_style());
        assert!(gateway.render("still works").await.is_ok());
    }

    #[tokio::test]
    async fn test_no_style_configured() {
        let renderer = Arc::new(Recorder::default());
        let mut gateway = RenderGateway::new(Some(renderer));
        gateway.load_style(None).await;
        assert!(!gateway.has_custom_style());
    }
}
