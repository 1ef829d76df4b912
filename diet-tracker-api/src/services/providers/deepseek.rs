//! DeepSeek chat completion provider.
//!
//! Speaks the OpenAI-compatible `/chat/completions` contract with bearer
//! authentication.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::upstream::{UpstreamClient, UpstreamError};

use super::{ChatCompletion, ChatProvider};
use crate::config::DeepSeekConfig;
use crate::models::TokenUsage;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub struct DeepSeekProvider {
    client: UpstreamClient,
    config: DeepSeekConfig,
}

impl DeepSeekProvider {
    pub fn new(client: UpstreamClient, config: DeepSeekConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!("{}{}", self.config.base_url, CHAT_COMPLETIONS_PATH)
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    async fn complete(&self, prompt: &str) -> Result<ChatCompletion, UpstreamError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to DeepSeek API"
        );

        let response: CompletionResponse = self
            .client
            .post_json(
                &self.completions_url(),
                self.config.api_key.expose_secret(),
                &request,
            )
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(UpstreamError::EmptyCompletion)?;

        let usage = response.usage.and_then(parse_usage);

        Ok(ChatCompletion { text, usage })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Usage is informational; a malformed block is dropped rather than failing
/// the reply.
fn parse_usage(raw: serde_json::Value) -> Option<TokenUsage> {
    match serde_json::from_value::<Usage>(raw) {
        Ok(u) => Some(TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed usage block from DeepSeek");
            None
        }
    }
}

// DeepSeek API types

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
