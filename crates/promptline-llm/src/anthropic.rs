//! Anthropic Claude API client.

use std::time::Instant;

use promptline_core::{AgentError, ModelConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{LlmMetrics, LlmResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    url: String,
    model: String,
    temperature: f32,
}

impl AnthropicClient {
    /// Creates a client for the given model and API key.
    pub fn new(model: &ModelConfig, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            url: format!("{}/messages", model.api_base().trim_end_matches('/')),
            model: model.model.clone(),
            temperature: model.temperature,
        }
    }

    /// Sends the prompt as a single user message and returns the complete response.
    pub async fn complete(&self, prompt: &str) -> Result<LlmResponse, AgentError> {
        let start = Instant::now();

        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: self.temperature,
            messages: vec![AnthropicMessage { role: "user", content: prompt }],
        };

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Anthropic API error: {} - {}", status, body);
            return Err(AgentError::LlmError(format!("Anthropic API error: {} - {}", status, body)));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ParseError(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");

        let metrics = LlmMetrics {
            input_tokens: body.usage.input_tokens.unwrap_or(0),
            output_tokens: body.usage.output_tokens.unwrap_or(0),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Anthropic: {}ms, tokens: {}/{} (in/out)",
            metrics.elapsed_ms, metrics.input_tokens, metrics.output_tokens
        );

        Ok(LlmResponse { content, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptline_core::Provider;

    #[test]
    fn request_serializes_single_user_message() {
        let request = AnthropicRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            messages: vec![AnthropicMessage { role: "user", content: "hi" }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn response_joins_text_blocks() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello "},{"type":"text","text":"world"}],
                "usage":{"input_tokens":3,"output_tokens":2}}"#,
        )
        .unwrap();
        let text: String = body.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(text, "Hello world");
        assert_eq!(body.usage.output_tokens, Some(2));
    }

    #[test]
    fn url_uses_model_api_base() {
        let model = ModelConfig {
            id: "c".into(),
            name: "C".into(),
            provider: Provider::Anthropic,
            model: "claude-3-haiku-20240307".into(),
            temperature: 0.0,
            api_base: Some("http://localhost:4000/v1/".into()),
        };
        let client = AnthropicClient::new(&model, "key");
        assert_eq!(client.url, "http://localhost:4000/v1/messages");
    }
}
