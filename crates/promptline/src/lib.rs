//! # Promptline — form-driven prompt pipelines
//!
//! Promptline turns a handful of form fields into a sequence of LLM calls.
//! Each step fills a prompt template from the form inputs, earlier step
//! outputs, literals, or web search results, and the run yields one output
//! block per step.
//!
//! ## Quick Start — Builder API
//!
//! ```rust,ignore
//! use promptline::prelude::*;
//! use std::collections::HashMap;
//!
//! let config = PipelineConfig::builder("stock-report", "Stock Report")
//!     .input("company")
//!     .step("history", "History Output")
//!         .model(model_ids::LLAMA3_70B)
//!         .template("Research the history of the company: {company}.")
//!         .done()
//!     .step("summary", "Summary Output")
//!         .model(model_ids::LLAMA3_8B)
//!         .template("Summarize for an investor:\n{history}")
//!         .bind("history", Source::output("history"))
//!         .done()
//!     .build();
//!
//! let settings = Settings::from_env();
//! let engine = PipelineEngine::new(
//!     config,
//!     builtin_models(&settings),
//!     client_from_settings(&settings),
//!     default_backend(settings.tavily_api_key.clone()),
//!     HashMap::new(),
//! )?;
//!
//! let inputs = HashMap::from([("company".to_string(), "Acme".to_string())]);
//! let run = engine.execute(inputs).await?;
//! println!("{}", run.last().map(|b| b.response.as_str()).unwrap_or_default());
//! ```
//!
//! ## Crate Structure
//!
//! | Crate | Description |
//! |-------|-------------|
//! | [`promptline_apps`] | Built-in apps, forms, idea-explorer sessions |
//! | [`promptline_config`] | Pipeline schema, value sources, settings, model registry |
//! | [`promptline_core`] | Error types, providers, model config, prompt templates |
//! | [`promptline_engine`] | Sequential step execution and run events |
//! | [`promptline_llm`] | LLM providers (Groq/OpenAI-compatible, Anthropic) |
//! | [`promptline_tools`] | Web search backends |
//!
//! ## Value Sources
//!
//! - `Input` — a form field
//! - `Output` — the response of an earlier step
//! - `Search` — web search results for a query rendered from the inputs
//! - `Literal` — a fixed string
//! - `Concat` — several sources joined by newlines

use std::sync::Arc;

// Re-export config types
pub use promptline_config::{
    builtin_models, model_ids, ConfigError, PipelineBuilder, PipelineConfig, Settings, Source,
    StepBuilder, StepConfig,
};

// Re-export core types
pub use promptline_core::{
    AgentError, ModelConfig, PipelineError, PromptTemplate, Provider, TemplateError,
};

// Re-export engine
pub use promptline_engine::{
    Inputs, ModelResolver, OutputBlock, PipelineEngine, PipelineRun, RunEvent, SearchHit,
};

// Re-export LLM clients
pub use promptline_llm::{LlmMetrics, LlmResponse, TextGenerator, UnifiedLlmClient};

// Re-export tools
pub use promptline_tools::{
    default_backend, DuckDuckGoSearch, SearchBackend, ToolError, WebSearchTool,
};

// Re-export apps
pub use promptline_apps::{
    AppCatalog, AppDefinition, AppKind, FieldKind, FieldSpec, FormSpec, FormValue, IdeaExplorer,
    Phase, SessionState, Submission,
};

// Provider-specific clients (hidden by default, use UnifiedLlmClient instead)
#[doc(hidden)]
pub use promptline_llm::{AnthropicClient, LlmClient};

/// Builds a generator holding every credential present in `settings`.
pub fn client_from_settings(settings: &Settings) -> Arc<dyn TextGenerator> {
    let client = [Provider::Groq, Provider::OpenAi, Provider::Anthropic]
        .into_iter()
        .fold(UnifiedLlmClient::new(), |client, provider| {
            match settings.credential(provider) {
                Some(key) => client.with_credential(provider, key),
                None => client,
            }
        });
    Arc::new(client)
}

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use promptline::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Core types
    pub use crate::{AgentError, ModelConfig, PipelineError, Provider};

    // Config types
    pub use crate::{builtin_models, model_ids, PipelineConfig, Settings, Source};

    // Engine
    pub use crate::{OutputBlock, PipelineEngine, PipelineRun, RunEvent};

    // LLM and search
    pub use crate::{
        client_from_settings, default_backend, LlmResponse, SearchBackend, TextGenerator,
        UnifiedLlmClient,
    };

    // Apps
    pub use crate::{AppCatalog, FormValue, Submission};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_builds_a_valid_pipeline() {
        let config = PipelineConfig::builder("demo", "Demo")
            .input("topic")
            .step("outline", "Outline")
            .model(model_ids::LLAMA3_8B)
            .template("Outline {topic}.")
            .done()
            .build();

        assert!(config.validate().is_ok());
        assert_eq!(config.model_ids(), vec![model_ids::LLAMA3_8B]);
    }
}
