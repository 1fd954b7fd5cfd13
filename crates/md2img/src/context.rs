//! Process-scoped conversion state
//!
//! Built once from configuration and shared with every handler through an
//! `Arc`. Everything here is immutable after [`ConversionContext::initialize`]
//! except the artifact registry, which guards itself.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::artifacts::ArtifactLifecycleManager;
use crate::classifier::ClassificationEngine;
use crate::config::{ConfigValidator, ConvertConfig, InterceptMode};
use crate::error::Result;
use crate::extractor::{ExtractionConfig, PatternExtractor};
use crate::render::{MarkdownRenderer, RenderGateway};

#[derive(Debug)]
pub struct ConversionContext {
    config: ConvertConfig,
    intercept_mode: InterceptMode,
    classifier: ClassificationEngine,
    extractor: PatternExtractor,
    gateway: RenderGateway,
    artifacts: ArtifactLifecycleManager,
}

impl ConversionContext {
    /// Build the context; configuration problems are logged, never fatal
    pub fn new(config: ConvertConfig, renderer: Option<Arc<dyn MarkdownRenderer>>) -> Self {
        for warning in ConfigValidator::validate(&config) {
            warn!(warning = %warning, "Configuration warning");
        }

        let intercept_mode = config.intercept_mode();
        let classifier = ClassificationEngine::from_config(&config);
        let extractor = PatternExtractor::new(ExtractionConfig::from(&config));
        let artifacts = ArtifactLifecycleManager::from_config(&config);

        debug!(
            mode = %classifier.config().mode,
            intercept = %intercept_mode,
            extraction = extractor.is_enabled(),
            "Built conversion context"
        );

        Self {
            config,
            intercept_mode,
            classifier,
            extractor,
            gateway: RenderGateway::new(renderer),
            artifacts,
        }
    }

    /// Startup work that must finish before the context is shared
    pub async fn initialize(&mut self) {
        let style_dir = self.config.style_dir();
        self.gateway.load_style(style_dir.as_deref()).await;
        info!(
            renderer = self.gateway.is_available(),
            custom_style = self.gateway.has_custom_style(),
            intercept = %self.intercept_mode,
            "Markdown conversion ready"
        );
    }

    /// Render `text`, persist it and hand the file to the lifecycle manager
    ///
    /// Returns the path of a PNG that stays on disk until its TTL elapses.
    pub async fn render_artifact(&self, text: &str) -> Result<PathBuf> {
        let handle = self.gateway.render(text).await?;
        let path = self.artifacts.persist(handle).await?;
        self.artifacts.register(&path);
        Ok(path)
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn intercept_mode(&self) -> InterceptMode {
        self.intercept_mode
    }

    pub fn classifier(&self) -> &ClassificationEngine {
        &self.classifier
    }

    pub fn extractor(&self) -> &PatternExtractor {
        &self.extractor
    }

    pub fn gateway(&self) -> &RenderGateway {
        &self.gateway
    }

    pub fn artifacts(&self) -> &ArtifactLifecycleManager {
        &self.artifacts
    }
}
