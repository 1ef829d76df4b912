//! LLM provider abstraction.
//!
//! Handlers only see [`ChatProvider`]; the concrete backend is chosen once at
//! startup.

pub mod deepseek;

use async_trait::async_trait;
use service_core::upstream::UpstreamError;

use crate::models::TokenUsage;

/// Text produced by one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Trait for single-turn chat completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `prompt` as one user message and return the first choice.
    ///
    /// Performs exactly one outbound call; nothing is cached.
    async fn complete(&self, prompt: &str) -> Result<ChatCompletion, UpstreamError>;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;
}
