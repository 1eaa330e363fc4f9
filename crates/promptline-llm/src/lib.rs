//! Text-generation backends for promptline.
//!
//! Every pipeline step reaches a backend through the [`TextGenerator`] trait:
//!
//! - [`UnifiedLlmClient`] — Recommended: routes by [`Provider`](promptline_core::Provider)
//! - [`LlmClient`] — OpenAI-compatible client (OpenAI, Groq)
//! - [`AnthropicClient`] — Claude models via the Anthropic Messages API
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptline_core::Provider;
//! use promptline_llm::{TextGenerator, UnifiedLlmClient};
//!
//! let client = UnifiedLlmClient::new().with_credential(Provider::Groq, api_key);
//! let response = client.generate(&model, "Research the history of the company: ACME.").await?;
//! println!("{}", response.content);
//! ```

mod anthropic;
mod client;
mod unified;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use unified::UnifiedLlmClient;

use async_trait::async_trait;
use promptline_core::{AgentError, ModelConfig};

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Complete response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub metrics: LlmMetrics,
}

impl LlmResponse {
    /// Response with no metrics attached.
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: content.into(), metrics: LlmMetrics::default() }
    }
}

/// A remote text-generation backend.
///
/// Invoked with a model (identifier and sampling temperature) and a fully
/// substituted prompt; returns the raw generated text. Implementations make
/// exactly one request per call and do not retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &ModelConfig, prompt: &str) -> Result<LlmResponse, AgentError>;
}

/// Converts any error into an AgentError::LlmError.
pub(crate) fn llm_err(e: impl ToString) -> AgentError {
    AgentError::LlmError(e.to_string())
}
