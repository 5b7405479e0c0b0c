//! Generation session: one conversation with the hosted model tiers.
//!
//! A turn goes to the preferred tier first. If that attempt fails for any
//! reason other than caller cancellation, the turn is retried exactly once
//! on the speed tier with web search disabled.

use crate::llm::{CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message};
use crate::settings::{GenerationSettings, ModelPreference};
use crate::studio::system_instruction::SYSTEM_INSTRUCTION;
use crate::studio::ComposedPrompt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One of the two hosted model configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Higher capability, slower.
    Quality,
    /// Lower latency. Also the fallback tier.
    Speed,
}

impl From<ModelPreference> for ModelTier {
    fn from(preference: ModelPreference) -> Self {
        match preference {
            ModelPreference::Quality => ModelTier::Quality,
            ModelPreference::Speed => ModelTier::Speed,
        }
    }
}

/// Providers backing each tier.
#[derive(Clone)]
pub struct ModelTiers {
    pub quality: Arc<dyn LlmProvider>,
    pub speed: Arc<dyn LlmProvider>,
}

impl ModelTiers {
    pub fn new(quality: Arc<dyn LlmProvider>, speed: Arc<dyn LlmProvider>) -> Self {
        Self { quality, speed }
    }

    pub fn provider(&self, tier: ModelTier) -> &Arc<dyn LlmProvider> {
        match tier {
            ModelTier::Quality => &self.quality,
            ModelTier::Speed => &self.speed,
        }
    }
}

/// A successful turn.
#[derive(Debug, Clone)]
pub struct SessionReply {
    pub response: CompletionResponse,
    /// Tier that produced the reply.
    pub tier: ModelTier,
    /// Model id that produced the reply.
    pub model: String,
    /// Whether the primary attempt failed and the fallback answered.
    pub fell_back: bool,
}

impl SessionReply {
    pub fn text(&self) -> &str {
        self.response.text()
    }
}

/// Conversation with the model tiers.
///
/// `send` takes `&mut self`, so a conversation has at most one turn in
/// flight.
pub struct GenerationSession {
    tiers: ModelTiers,
    system_instruction: String,
    history: Vec<Message>,
    timeout: Duration,
}

impl GenerationSession {
    pub fn new(tiers: ModelTiers) -> Self {
        Self {
            tiers,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            history: Vec::new(),
            timeout: CompletionOptions::default().timeout,
        }
    }

    /// Use a different system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tiers(&self) -> &ModelTiers {
        &self.tiers
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Previous turns, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Send one composed prompt, falling back to the speed tier once.
    ///
    /// Cancelling `cancel` during the primary attempt returns its failure
    /// (or [`LlmError::Cancelled`]) without trying the fallback. On success
    /// the prompt and the reply are appended to the history.
    pub async fn send(
        &mut self,
        prompt: &ComposedPrompt,
        generation: &GenerationSettings,
        cancel: &CancellationToken,
    ) -> Result<SessionReply, LlmError> {
        let messages = self.request_messages(&prompt.text);
        let primary_tier = ModelTier::from(generation.model_preference);
        let primary_options = CompletionOptions {
            temperature: generation.temperature,
            timeout: self.timeout,
            web_search: prompt.web_search,
            ..Default::default()
        };

        let primary = self.tiers.provider(primary_tier).clone();
        debug!(
            model = %primary.model(),
            tier = ?primary_tier,
            web_search = primary_options.web_search,
            "Starting generation turn"
        );

        let (response, tier, model, fell_back) =
            match attempt(primary.as_ref(), &messages, &primary_options, cancel).await {
                Ok(response) => (response, primary_tier, primary.model().to_string(), false),
                Err(e) if cancel.is_cancelled() => {
                    info!(model = %primary.model(), "Generation cancelled");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        model = %primary.model(),
                        error = %e,
                        "Primary generation failed, falling back to speed tier"
                    );
                    let fallback = self.tiers.provider(ModelTier::Speed).clone();
                    let fallback_options = CompletionOptions {
                        web_search: false,
                        ..primary_options
                    };
                    let response =
                        attempt(fallback.as_ref(), &messages, &fallback_options, cancel).await?;
                    (response, ModelTier::Speed, fallback.model().to_string(), true)
                }
            };

        self.history.push(Message::user(prompt.text.clone()));
        self.history.push(response.message.clone());

        Ok(SessionReply {
            response,
            tier,
            model,
            fell_back,
        })
    }

    fn request_messages(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.system_instruction.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(prompt));
        messages
    }
}

/// One provider call raced against the cancellation token.
async fn attempt(
    provider: &dyn LlmProvider,
    messages: &[Message],
    options: &CompletionOptions,
    cancel: &CancellationToken,
) -> Result<CompletionResponse, LlmError> {
    if cancel.is_cancelled() {
        return Err(LlmError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LlmError::Cancelled),
        result = provider.complete(messages, options) => result,
    }
}
