//! LLM provider abstraction layer.
//!
//! This module provides a trait-based abstraction for hosted generation
//! models, so the session manager can work with any backend and tests can
//! substitute scripted providers.

mod gemini;
mod provider;
mod types;

pub use gemini::{ApiKeySource, GeminiProvider};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
