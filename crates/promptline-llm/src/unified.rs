//! Unified LLM client that routes to the appropriate provider.

use std::collections::HashMap;

use async_trait::async_trait;
use promptline_core::{AgentError, ModelConfig, Provider};
use tracing::debug;

use crate::anthropic::AnthropicClient;
use crate::client::LlmClient;
use crate::{LlmResponse, TextGenerator};

/// Routes requests to OpenAI-compatible or Anthropic clients based on the model's provider.
#[derive(Clone, Default)]
pub struct UnifiedLlmClient {
    credentials: HashMap<Provider, String>,
}

impl UnifiedLlmClient {
    /// Creates a client with no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the API key for a provider.
    pub fn with_credential(mut self, provider: Provider, api_key: impl Into<String>) -> Self {
        self.credentials.insert(provider, api_key.into());
        self
    }

    /// Returns true if a credential is registered for the provider.
    pub fn has_credential(&self, provider: Provider) -> bool {
        self.credentials.contains_key(&provider)
    }

    fn api_key(&self, provider: Provider) -> Result<&str, AgentError> {
        self.credentials
            .get(&provider)
            .map(String::as_str)
            .ok_or(AgentError::MissingCredential(provider))
    }
}

#[async_trait]
impl TextGenerator for UnifiedLlmClient {
    async fn generate(&self, model: &ModelConfig, prompt: &str) -> Result<LlmResponse, AgentError> {
        let api_key = self.api_key(model.provider)?;
        debug!("{} → {} (temperature {})", model.provider, model.model, model.temperature);

        match model.provider {
            Provider::OpenAi | Provider::Groq => LlmClient::new(model, api_key).complete(prompt).await,
            Provider::Anthropic => AnthropicClient::new(model, api_key).complete(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let client = UnifiedLlmClient::new().with_credential(Provider::Groq, "gsk");
        let model = ModelConfig {
            id: "anthropic-haiku".into(),
            name: "Haiku".into(),
            provider: Provider::Anthropic,
            model: "claude-3-haiku-20240307".into(),
            temperature: 0.0,
            api_base: None,
        };

        let err = client.generate(&model, "hello").await.unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential(Provider::Anthropic)));
        assert!(client.has_credential(Provider::Groq));
    }
}
