//! OpenAI-compatible chat client.
//!
//! Works with the OpenAI API and any compatible endpoint, including Groq's
//! `/openai/v1` endpoint.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use promptline_core::{AgentError, ModelConfig};
use tracing::info;

use crate::{llm_err, LlmMetrics, LlmResponse};

/// Extracts content and metrics from a completion response.
fn extract_response(response: CreateChatCompletionResponse, elapsed_ms: u64) -> Result<LlmResponse, AgentError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| AgentError::LlmError("No response content".into()))?;

    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    info!(
        "LLM: {}ms, tokens: {}/{} (in/out)",
        elapsed_ms, input_tokens, output_tokens
    );

    Ok(LlmResponse {
        content,
        metrics: LlmMetrics { input_tokens, output_tokens, elapsed_ms },
    })
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl LlmClient {
    /// Creates a client for the given model using its API base and the supplied key.
    pub fn new(model: &ModelConfig, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(model.api_base())
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: model.model.clone(),
            temperature: model.temperature,
        }
    }

    /// Sends the prompt as a single user message and returns the complete response.
    pub async fn complete(&self, prompt: &str) -> Result<LlmResponse, AgentError> {
        let start = Instant::now();
        let messages = vec![user_message(prompt)?];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(messages)
            .build()
            .map_err(llm_err)?;

        let response = self.client.chat().create(request).await.map_err(llm_err)?;
        extract_response(response, start.elapsed().as_millis() as u64)
    }
}

/// Helper to build a user message.
fn user_message(content: &str) -> Result<ChatCompletionRequestMessage, AgentError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(llm_err)?,
    ))
}
