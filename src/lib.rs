//! Shared fixtures for the md2img integration tests
//!
//! Collaborators here are built on the `image` crate so the whole render → save
//! path runs for real, only without any markdown layout.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use md2img::{
    ConvertConfig, InterceptionOrchestrator, MarkdownRenderer, MarkdownStyle, MessageChain,
    MessageEvent, RenderedImage, SavableImage,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Install a test-friendly tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Configuration writing artifacts into `dir` with a short length threshold
pub fn test_config(dir: &Path) -> ConvertConfig {
    ConvertConfig {
        length_limit: 20,
        artifact_dir: Some(dir.to_path_buf()),
        shutdown_grace_ms: 200,
        ..Default::default()
    }
}

/// Start an orchestrator backed by `renderer`
pub async fn start(config: ConvertConfig, renderer: Arc<MockRenderer>) -> InterceptionOrchestrator {
    InterceptionOrchestrator::start(config, Some(renderer)).await
}

/// A render result that wraps its image instead of being one
pub struct WrappedRender {
    image: RgbaImage,
}

impl RenderedImage for WrappedRender {
    fn embedded_image(&self) -> Option<&dyn SavableImage> {
        Some(&self.image)
    }
}

/// Custom style that returns wrapped results
pub struct MockStyle {
    calls: Arc<Mutex<Vec<String>>>,
}

impl MarkdownStyle for MockStyle {
    fn render(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>> {
        lock(&self.calls).push(text.to_string());
        Ok(Box::new(WrappedRender {
            image: canvas(text),
        }))
    }
}

/// Renderer producing a small solid image per call
#[derive(Default)]
pub struct MockRenderer {
    default_calls: Mutex<Vec<String>>,
    style_calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A renderer whose every conversion fails
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    /// Texts passed to the default conversion path
    pub fn default_calls(&self) -> Vec<String> {
        lock(&self.default_calls).clone()
    }

    /// Texts passed to the custom style
    pub fn style_calls(&self) -> Vec<String> {
        lock(&self.style_calls).clone()
    }
}

#[async_trait]
impl MarkdownRenderer for MockRenderer {
    fn load_style(&self, dir: &Path) -> anyhow::Result<Arc<dyn MarkdownStyle>> {
        if !dir.join("style.yml").exists() {
            anyhow::bail!("no style.yml in {}", dir.display());
        }
        Ok(Arc::new(MockStyle {
            calls: Arc::clone(&self.style_calls),
        }))
    }

    async fn default_convert(&self, text: &str) -> anyhow::Result<Box<dyn RenderedImage>> {
        if self.fail {
            anyhow::bail!("layout engine crashed");
        }
        lock(&self.default_calls).push(text.to_string());
        Ok(Box::new(canvas(text)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn canvas(text: &str) -> RgbaImage {
    let width = text.chars().count().clamp(1, 64) as u32;
    RgbaImage::from_pixel(width, 8, Rgba([255, 255, 255, 255]))
}

/// Host event that records everything sent through it
#[derive(Default)]
pub struct RecordingEvent {
    sent: Mutex<Vec<MessageChain>>,
    stops: AtomicUsize,
}

impl RecordingEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<MessageChain> {
        lock(&self.sent).clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageEvent for RecordingEvent {
    async fn send(&self, chain: MessageChain) -> anyhow::Result<()> {
        lock(&self.sent).push(chain);
        Ok(())
    }

    fn stop_event(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.stop_count() > 0
    }
}
