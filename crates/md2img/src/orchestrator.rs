//! Entry points called by the host
//!
//! Three paths lead into the pipeline:
//!
//! 1. **Command**: the user asks for a conversion explicitly. The text is always
//!    rendered, no classification.
//! 2. **Pre-send filter**: outbound chains are rewritten in place, plain-text
//!    components that classify as markdown becoming images.
//! 3. **LLM-response filter**: the model's text is rendered and sent directly,
//!    then the original response is stopped.
//!
//! Only one of the two filters is active, chosen by `intercept_mode`. Every
//! failure is caught here; the host never sees an error.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{ConvertConfig, InterceptMode};
use crate::context::ConversionContext;
use crate::error::Md2ImgError;
use crate::extractor::format_extracted;
use crate::render::MarkdownRenderer;
use crate::types::{
    ImageSource, InterceptOutcome, LlmResponse, MessageChain, MessageComponent, MessageEvent,
};

/// Reply to a command with nothing after the command token
pub const EMPTY_COMMAND_REPLY: &str = "Please provide the Markdown content to convert.";

/// Routes host events through classification, rendering and artifact tracking
#[derive(Debug, Clone)]
pub struct InterceptionOrchestrator {
    ctx: Arc<ConversionContext>,
}

impl InterceptionOrchestrator {
    /// Wrap an initialized context
    pub fn new(ctx: Arc<ConversionContext>) -> Self {
        Self { ctx }
    }

    /// Build, initialize and wrap a context in one step
    pub async fn start(config: ConvertConfig, renderer: Option<Arc<dyn MarkdownRenderer>>) -> Self {
        let mut ctx = ConversionContext::new(config, renderer);
        ctx.initialize().await;
        Self::new(Arc::new(ctx))
    }

    pub fn context(&self) -> &Arc<ConversionContext> {
        &self.ctx
    }

    /// Handle the explicit conversion command
    ///
    /// `raw` is the full message text including the command token. Replies are
    /// returned in the order they must be sent.
    pub async fn handle_command(&self, raw: &str) -> Vec<MessageChain> {
        let content = strip_command(raw, &self.ctx.config().command_name);
        if content.is_empty() {
            debug!("Command without content");
            return vec![MessageChain::new().message(EMPTY_COMMAND_REPLY)];
        }

        info!(chars = content.chars().count(), "Converting on command");
        match self.ctx.render_artifact(content).await {
            Ok(path) => {
                let mut replies = vec![MessageChain::new().file_image(path)];
                replies.extend(self.extraction_message(content));
                replies
            }
            Err(e) => {
                error!(error = %e, "Command conversion failed");
                vec![MessageChain::new().message(e.user_message())]
            }
        }
    }

    /// Rewrite an outbound chain before it is sent
    ///
    /// Converted text components are replaced in place; everything else keeps
    /// its position. The chain is only touched when at least one conversion
    /// succeeded.
    pub async fn on_decorating_result(
        &self,
        event: &dyn MessageEvent,
        chain: &mut MessageChain,
    ) -> InterceptOutcome {
        if self.ctx.intercept_mode() != InterceptMode::PreSend {
            return InterceptOutcome::Skipped;
        }

        let mut rebuilt = Vec::with_capacity(chain.len());
        let mut converted_texts = Vec::new();
        let mut failures = 0usize;

        for component in chain.iter() {
            let text = match component {
                MessageComponent::Plain(text) if self.ctx.classifier().should_convert(text) => text,
                other => {
                    rebuilt.push(other.clone());
                    continue;
                }
            };

            match self.ctx.render_artifact(text).await {
                Ok(path) => {
                    debug!(path = %path.display(), "Replaced text component with image");
                    rebuilt.push(MessageComponent::Image(ImageSource::File(path)));
                    converted_texts.push(text.as_str());
                }
                Err(e) => {
                    warn!(error = %e, "Conversion failed, keeping text component");
                    failures += 1;
                    rebuilt.push(component.clone());
                }
            }
        }

        if converted_texts.is_empty() {
            return if failures > 0 {
                InterceptOutcome::Failed
            } else {
                InterceptOutcome::Skipped
            };
        }

        let converted = converted_texts.len();
        let side_messages: Vec<MessageChain> = converted_texts
            .into_iter()
            .filter_map(|text| self.extraction_message(text))
            .collect();

        chain.replace(rebuilt);
        info!(converted, failures, "Rewrote outbound chain");

        for message in side_messages {
            if let Err(e) = send(event, message).await {
                warn!(error = %e, "Failed to send extracted content");
            }
        }

        InterceptOutcome::Converted(converted)
    }

    /// Replace a language-model response with its rendered image
    ///
    /// On success the image goes out directly and propagation is stopped, so
    /// the text version is never delivered. On failure the response is left
    /// alone and a single error message is sent.
    pub async fn on_llm_response(
        &self,
        event: &dyn MessageEvent,
        response: &LlmResponse,
    ) -> InterceptOutcome {
        if self.ctx.intercept_mode() != InterceptMode::LlmResponse {
            return InterceptOutcome::Skipped;
        }

        let Some(text) = response.result_chain.first_text() else {
            debug!("LLM response has no text segment");
            return InterceptOutcome::Skipped;
        };
        debug!(text = %text, "LLM response received");

        if !self.ctx.classifier().should_convert(text) {
            return InterceptOutcome::Skipped;
        }
        info!("Markdown content detected, converting LLM response");

        let delivered = match self.ctx.render_artifact(text).await {
            Ok(path) => send(event, MessageChain::new().file_image(path)).await,
            Err(e) => Err(e),
        };

        if let Err(e) = delivered {
            error!(error = %e, "LLM response conversion failed");
            if let Err(send_err) = send(event, MessageChain::new().message(e.user_message())).await {
                warn!(error = %send_err, "Failed to report conversion failure");
            }
            return InterceptOutcome::Failed;
        }

        if let Some(message) = self.extraction_message(text) {
            if let Err(e) = send(event, message).await {
                warn!(error = %e, "Failed to send extracted content");
            }
        }

        event.stop_event();
        InterceptOutcome::Converted(1)
    }

    /// Remove every artifact and wait briefly for pending deletions
    pub async fn terminate(&self) {
        info!(tracked = self.ctx.artifacts().len(), "Shutting down markdown conversion");
        self.ctx
            .artifacts()
            .shutdown(self.ctx.config().shutdown_grace())
            .await;
    }

    fn extraction_message(&self, text: &str) -> Option<MessageChain> {
        let extractor = self.ctx.extractor();
        if !extractor.is_enabled() {
            return None;
        }
        format_extracted(&extractor.extract(text)).map(|body| MessageChain::new().message(body))
    }
}

/// Remove the command token (with an optional leading `/`) and surrounding whitespace
fn strip_command<'a>(raw: &'a str, command: &str) -> &'a str {
    let trimmed = raw.trim_start();
    let without_slash = trimmed.strip_prefix('/').unwrap_or(trimmed);
    match without_slash.strip_prefix(command) {
        Some(rest) if !command.is_empty() => rest.trim(),
        _ => trimmed.trim(),
    }
}

async fn send(event: &dyn MessageEvent, chain: MessageChain) -> crate::error::Result<()> {
    event
        .send(chain)
        .await
        .map_err(|e| Md2ImgError::HostError(format!("{:#}", e)))
}
