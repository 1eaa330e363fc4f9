//! Core domain types and error definitions for promptline.
//!
//! This crate provides the fundamental types shared across the workspace:
//!
//! - [`AgentError`] — Error type for remote backend calls
//! - [`PipelineError`] — Error type for form validation and pipeline runs
//! - [`ModelConfig`] and [`Provider`] — Text-generation model configuration
//! - [`PromptTemplate`] — Named prompt template with a declared placeholder set
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use promptline_core::PromptTemplate;
//!
//! let template = PromptTemplate::new("history", "Research the history of the company: {company}.").unwrap();
//! let values = HashMap::from([("company".to_string(), "ACME".to_string())]);
//!
//! assert_eq!(template.render(&values).unwrap(), "Research the history of the company: ACME.");
//! ```

mod template;

pub use template::{PromptTemplate, TemplateError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by remote text-generation or search backends.
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM API request failed.
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// Failed to parse a backend response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// External API call failed.
    #[error("External API error: {0}")]
    ExternalApi(String),

    /// No credential is configured for the provider.
    #[error("Missing credential for provider '{0}'")]
    MissingCredential(Provider),
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::ParseError(err.to_string())
    }
}

/// Errors raised while validating a form or executing a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required form field was empty or absent.
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// A form value was not acceptable for its field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Template substitution failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The text-generation backend failed.
    #[error(transparent)]
    Llm(#[from] AgentError),

    /// The web-search backend failed.
    #[error("Search failed: {0}")]
    Search(String),

    /// A step referenced an output that has not been produced.
    #[error("Output of step '{0}' is not available")]
    UnresolvedOutput(String),

    /// A session operation was invoked in the wrong phase.
    #[error("Operation requires phase '{expected}', session is in '{actual}'")]
    InvalidPhase { expected: String, actual: String },

    /// A requested downloadable artifact does not exist.
    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),
}

/// Remote text-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// Groq's OpenAI-compatible endpoint.
    Groq,
    /// Anthropic Messages API.
    Anthropic,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn credential_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Default API base URL for this provider.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Anthropic => "anthropic",
        };
        write!(f, "{}", s)
    }
}

/// Configuration for a text-generation model.
///
/// Every pipeline step names a model by [`ModelConfig::id`]; the backend is
/// invoked with the model identifier and sampling temperature held here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Unique identifier for this model configuration.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Provider serving the model.
    pub provider: Provider,
    /// The provider's model identifier (e.g., "llama3-70b-8192").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional API base URL override.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl ModelConfig {
    /// Returns the API base, falling back to the provider default.
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(self.provider.default_api_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Provider::Groq).unwrap(), "\"groq\"");
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), "\"openai\"");
    }

    #[test]
    fn model_api_base_falls_back_to_provider() {
        let mut model = ModelConfig {
            id: "groq-llama3-70b".into(),
            name: "Llama 3 70B (Groq)".into(),
            provider: Provider::Groq,
            model: "llama3-70b-8192".into(),
            temperature: 0.5,
            api_base: None,
        };
        assert_eq!(model.api_base(), "https://api.groq.com/openai/v1");

        model.api_base = Some("http://localhost:8080/v1".into());
        assert_eq!(model.api_base(), "http://localhost:8080/v1");
    }

    #[test]
    fn missing_input_message_names_field() {
        let err = PipelineError::MissingInput("facts".into());
        assert_eq!(err.to_string(), "Missing required input: facts");
    }
}
