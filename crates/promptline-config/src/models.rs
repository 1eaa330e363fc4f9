//! Built-in model registry.

use promptline_core::{ModelConfig, Provider};

use crate::Settings;

/// Model IDs referenced by the built-in apps.
pub mod model_ids {
    pub const LLAMA3_70B: &str = "groq-llama3-70b";
    pub const GEMMA2_9B: &str = "groq-gemma2-9b";
    pub const LLAMA3_8B: &str = "groq-llama3-8b";
    pub const LLAMA3_8B_TOOL_USE: &str = "groq-llama3-8b-tool-use";
    pub const CLAUDE_OPUS: &str = "anthropic-opus";
    pub const CLAUDE_SONNET: &str = "anthropic-sonnet";
    pub const CLAUDE_HAIKU: &str = "anthropic-haiku";
    pub const CLAUDE_CONVERSATION: &str = "anthropic-conversation";
}

fn model(id: &str, name: &str, provider: Provider, model: &str, temperature: f32) -> ModelConfig {
    ModelConfig {
        id: id.into(),
        name: name.into(),
        provider,
        model: model.into(),
        temperature,
        api_base: None,
    }
}

/// Returns the model registry, applying API base overrides from settings.
pub fn builtin_models(settings: &Settings) -> Vec<ModelConfig> {
    use model_ids::*;

    let mut models = vec![
        model(LLAMA3_70B, "Llama 3 70B (Groq)", Provider::Groq, "llama3-70b-8192", 0.5),
        model(GEMMA2_9B, "Gemma 2 9B (Groq)", Provider::Groq, "gemma2-9b-it", 0.5),
        model(LLAMA3_8B, "Llama 3 8B (Groq)", Provider::Groq, "llama3-8b-8192", 0.5),
        model(
            LLAMA3_8B_TOOL_USE,
            "Llama 3 8B Tool Use (Groq)",
            Provider::Groq,
            "llama3-groq-8b-8192-tool-use-preview",
            0.5,
        ),
        model(CLAUDE_OPUS, "Claude 3 Opus (Anthropic)", Provider::Anthropic, "claude-3-opus-20240229", 0.0),
        model(CLAUDE_SONNET, "Claude 3 Sonnet (Anthropic)", Provider::Anthropic, "claude-3-sonnet-20240229", 0.0),
        model(CLAUDE_HAIKU, "Claude 3 Haiku (Anthropic)", Provider::Anthropic, "claude-3-haiku-20240307", 0.0),
        model(
            CLAUDE_CONVERSATION,
            "Claude 3 Sonnet, conversational (Anthropic)",
            Provider::Anthropic,
            "claude-3-sonnet-20240229",
            0.7,
        ),
    ];

    for m in &mut models {
        m.api_base = settings.api_base(m.provider).map(String::from);
    }

    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let models = builtin_models(&Settings::default());
        let mut ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), models.len());
    }

    #[test]
    fn api_base_override_applies_per_provider() {
        let settings = Settings::from_lookup(|k| (k == "GROQ_API_BASE").then(|| "http://proxy/v1".to_string()));
        let models = builtin_models(&settings);
        let groq = models.iter().find(|m| m.id == model_ids::LLAMA3_70B).unwrap();
        let claude = models.iter().find(|m| m.id == model_ids::CLAUDE_HAIKU).unwrap();
        assert_eq!(groq.api_base(), "http://proxy/v1");
        assert_eq!(claude.api_base(), "https://api.anthropic.com/v1");
    }
}
