//! Pipeline configuration schema, credential settings, and model registry.
//!
//! This crate defines the data structures for promptline pipelines:
//!
//! - [`PipelineConfig`] — Ordered list of steps plus the form inputs they read
//! - [`PipelineBuilder`] — Fluent API for building pipelines programmatically
//! - [`StepConfig`] — A single template-fill-and-invoke step
//! - [`Source`] — Where a placeholder value comes from
//! - [`Settings`] — Credentials and endpoints resolved from the environment
//! - [`builtin_models`] — The model registry used by the built-in apps
//!
//! # Builder API
//!
//! ```rust
//! use promptline_config::{PipelineConfig, Source};
//!
//! let config = PipelineConfig::builder("stock-report", "Stock Analysis")
//!     .input("company")
//!     .step("history", "History Output")
//!         .model("groq-llama3-70b")
//!         .template("Research the history of the company: {company}.")
//!         .done()
//!     .step("news", "News Output")
//!         .model("groq-gemma2-9b")
//!         .template("Summarize the news: {news}")
//!         .bind("news", Source::search("{company} news last month"))
//!         .done()
//!     .build();
//!
//! assert_eq!(config.steps.len(), 2);
//! config.validate().unwrap();
//! ```

mod models;
mod settings;

pub use models::{builtin_models, model_ids};
pub use settings::Settings;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use promptline_core::{PromptTemplate, Provider, TemplateError};
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading, validating, or configuring pipelines.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A step template could not be parsed.
    #[error("Invalid template in step '{step_id}': {source}")]
    Template {
        step_id: String,
        #[source]
        source: TemplateError,
    },

    /// Pipeline validation failed.
    #[error("Invalid pipeline '{pipeline_id}': {message}")]
    Validation {
        pipeline_id: String,
        message: String,
    },

    /// A credential required at startup is absent.
    #[error("Missing credential: set {env} for provider '{provider}'")]
    MissingCredential { provider: Provider, env: &'static str },
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates a validation error.
    pub fn validation(pipeline_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            pipeline_id: pipeline_id.into(),
            message: message.into(),
        }
    }
}

/// Where the value for a placeholder comes from.
///
/// A placeholder without an explicit binding reads the form input of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Source {
    /// A submitted form value.
    Input(String),
    /// The raw output of an earlier step.
    Output(String),
    /// Raw web-search result text for a query template filled from form inputs.
    Search(String),
    /// A fixed value.
    Literal(String),
    /// Several values joined with a newline.
    Concat(Vec<Source>),
}

impl Source {
    pub fn input(name: impl Into<String>) -> Self {
        Self::Input(name.into())
    }

    pub fn output(step_id: impl Into<String>) -> Self {
        Self::Output(step_id.into())
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self::Search(query.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn concat(sources: impl IntoIterator<Item = Source>) -> Self {
        Self::Concat(sources.into_iter().collect())
    }

    /// Returns `true` if resolving this source issues a web search.
    pub fn uses_search(&self) -> bool {
        match self {
            Source::Search(_) => true,
            Source::Concat(parts) => parts.iter().any(Source::uses_search),
            _ => false,
        }
    }
}

/// Configuration for a single template-fill-and-invoke step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Unique identifier for this step within the pipeline.
    pub id: String,
    /// Label shown above the step's output block.
    pub label: String,
    /// Optional stage heading the step belongs to.
    #[serde(default)]
    pub stage: Option<String>,
    /// Model ID from the registry.
    pub model: String,
    /// Prompt template text.
    pub template: String,
    /// Explicit placeholder bindings.
    #[serde(default)]
    pub bindings: BTreeMap<String, Source>,
}

impl StepConfig {
    /// Parses this step's template.
    pub fn compile(&self) -> Result<PromptTemplate, ConfigError> {
        PromptTemplate::new(self.id.clone(), self.template.clone()).map_err(|source| {
            ConfigError::Template { step_id: self.id.clone(), source }
        })
    }

    /// Returns the source for a placeholder, defaulting to the form input of the same name.
    pub fn source_for(&self, placeholder: &str) -> Source {
        self.bindings
            .get(placeholder)
            .cloned()
            .unwrap_or_else(|| Source::Input(placeholder.to_string()))
    }

    /// Returns `true` if any binding of this step issues a web search.
    pub fn is_search_augmented(&self) -> bool {
        self.bindings.values().any(Source::uses_search)
    }
}

/// Complete pipeline configuration: the form inputs it reads and its ordered steps.
///
/// # Loading from File
///
/// ```rust,ignore
/// let config = PipelineConfig::from_file("pipeline.json")?;
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Unique identifier for this pipeline.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Optional description of what this pipeline does.
    #[serde(default)]
    pub description: String,
    /// Names of the form inputs available to steps.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Steps in execution order.
    pub steps: Vec<StepConfig>,
}

impl PipelineConfig {
    /// Creates a new builder for constructing a pipeline programmatically.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(id, name)
    }

    /// Loads a pipeline configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    /// Parses a pipeline configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes this configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Finds a step by ID.
    pub fn step(&self, id: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Returns the distinct model IDs referenced by steps, in first-use order.
    pub fn model_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .map(|s| s.model.as_str())
            .filter(|m| seen.insert(*m))
            .collect()
    }

    /// Checks that every step can be resolved from inputs and earlier outputs.
    ///
    /// - step IDs are unique and every step names a model
    /// - every template parses
    /// - every placeholder resolves to a declared input, an earlier step, a search, or a literal
    /// - search queries only read declared inputs
    /// - no binding targets a placeholder the template does not use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let inputs: HashSet<&str> = self.inputs.iter().map(String::as_str).collect();
        let mut earlier: HashSet<&str> = HashSet::new();

        for step in &self.steps {
            if earlier.contains(step.id.as_str()) {
                return Err(ConfigError::validation(&self.id, format!("duplicate step id '{}'", step.id)));
            }
            if step.model.is_empty() {
                return Err(ConfigError::validation(&self.id, format!("step '{}' has no model", step.id)));
            }

            let template = step.compile()?;

            if let Some(unused) = step.bindings.keys().find(|k| !template.placeholders().contains(*k)) {
                return Err(ConfigError::validation(
                    &self.id,
                    format!("step '{}' binds '{}' which its template never uses", step.id, unused),
                ));
            }

            for placeholder in template.placeholders() {
                let source = step.source_for(placeholder);
                self.check_source(&step.id, &source, &inputs, &earlier)?;
            }

            earlier.insert(step.id.as_str());
        }

        Ok(())
    }

    fn check_source(
        &self,
        step_id: &str,
        source: &Source,
        inputs: &HashSet<&str>,
        earlier: &HashSet<&str>,
    ) -> Result<(), ConfigError> {
        match source {
            Source::Input(name) if !inputs.contains(name.as_str()) => Err(ConfigError::validation(
                &self.id,
                format!("step '{}' reads undeclared input '{}'", step_id, name),
            )),
            Source::Output(id) if !earlier.contains(id.as_str()) => Err(ConfigError::validation(
                &self.id,
                format!("step '{}' reads output of '{}' which does not run before it", step_id, id),
            )),
            Source::Search(query) => {
                let query = PromptTemplate::new(format!("{}:search", step_id), query.clone())
                    .map_err(|source| ConfigError::Template { step_id: step_id.to_string(), source })?;
                match query.placeholders().iter().find(|p| !inputs.contains(p.as_str())) {
                    Some(p) => Err(ConfigError::validation(
                        &self.id,
                        format!("search query in step '{}' reads undeclared input '{}'", step_id, p),
                    )),
                    None => Ok(()),
                }
            }
            Source::Concat(parts) if parts.is_empty() => Err(ConfigError::validation(
                &self.id,
                format!("step '{}' binds an empty concatenation", step_id),
            )),
            Source::Concat(parts) => parts
                .iter()
                .try_for_each(|p| self.check_source(step_id, p, inputs, earlier)),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Builder API
// ============================================================================

/// Builder for constructing [`PipelineConfig`] programmatically.
///
/// Use [`PipelineConfig::builder()`] to create a new builder.
#[derive(Debug)]
pub struct PipelineBuilder {
    id: String,
    name: String,
    description: String,
    inputs: Vec<String>,
    steps: Vec<StepConfig>,
}

impl PipelineBuilder {
    fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            inputs: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Sets the pipeline description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Declares a form input.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    /// Declares several form inputs.
    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Starts building a new step with the given ID and display label.
    pub fn step(self, id: impl Into<String>, label: impl Into<String>) -> StepBuilder {
        StepBuilder::new(self, id.into(), label.into())
    }

    /// Builds the final [`PipelineConfig`].
    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            id: self.id,
            name: self.name,
            description: self.description,
            inputs: self.inputs,
            steps: self.steps,
        }
    }

    fn add_step(mut self, step: StepConfig) -> Self {
        self.steps.push(step);
        self
    }
}

/// Builder for a single step within a pipeline.
///
/// Created via [`PipelineBuilder::step()`].
#[derive(Debug)]
pub struct StepBuilder {
    pipeline: PipelineBuilder,
    id: String,
    label: String,
    stage: Option<String>,
    model: String,
    template: String,
    bindings: BTreeMap<String, Source>,
}

impl StepBuilder {
    fn new(pipeline: PipelineBuilder, id: String, label: String) -> Self {
        Self {
            pipeline,
            id,
            label,
            stage: None,
            model: String::new(),
            template: String::new(),
            bindings: BTreeMap::new(),
        }
    }

    /// Sets the stage heading for this step.
    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Sets the model ID for this step.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the prompt template text.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Binds a placeholder to a source.
    pub fn bind(mut self, placeholder: impl Into<String>, source: Source) -> Self {
        self.bindings.insert(placeholder.into(), source);
        self
    }

    /// Finishes building this step and returns to the pipeline builder.
    pub fn done(self) -> PipelineBuilder {
        let step = StepConfig {
            id: self.id,
            label: self.label,
            stage: self.stage,
            model: self.model,
            template: self.template,
            bindings: self.bindings,
        };
        self.pipeline.add_step(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step() -> PipelineBuilder {
        PipelineConfig::builder("p", "P")
            .input("theme")
            .step("first", "First")
                .model("m")
                .template("About {theme}")
                .done()
            .step("second", "Second")
                .model("m")
                .template("Expand {prior}")
                .bind("prior", Source::output("first"))
                .done()
    }

    #[test]
    fn valid_pipeline_passes() {
        two_step().build().validate().unwrap();
    }

    #[test]
    fn rejects_forward_output_reference() {
        let config = PipelineConfig::builder("p", "P")
            .step("first", "First")
                .model("m")
                .template("{later}")
                .bind("later", Source::output("second"))
                .done()
            .step("second", "Second")
                .model("m")
                .template("plain")
                .done()
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("does not run before it"), "{}", err);
    }

    #[test]
    fn rejects_undeclared_input() {
        let config = PipelineConfig::builder("p", "P")
            .step("only", "Only")
                .model("m")
                .template("{company}")
                .done()
            .build();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn rejects_search_reading_outputs() {
        let config = two_step()
            .step("third", "Third")
                .model("m")
                .template("{results}")
                .bind("results", Source::search("{first} news"))
                .done()
            .build();
        assert!(config.validate().unwrap_err().to_string().contains("undeclared input 'first'"));
    }

    #[test]
    fn rejects_empty_concat_at_any_depth() {
        let config = two_step()
            .step("third", "Third")
                .model("m")
                .template("{joined}")
                .bind("joined", Source::concat([Source::literal("x"), Source::Concat(Vec::new())]))
                .done()
            .build();
        assert!(config.validate().unwrap_err().to_string().contains("empty concatenation"));
    }

    #[test]
    fn rejects_duplicate_ids_and_unused_bindings() {
        let dup = two_step()
            .step("first", "Again")
                .model("m")
                .template("x")
                .done()
            .build();
        assert!(dup.validate().unwrap_err().to_string().contains("duplicate"));

        let unused = PipelineConfig::builder("p", "P")
            .step("s", "S")
                .model("m")
                .template("no slots")
                .bind("ghost", Source::literal("boo"))
                .done()
            .build();
        assert!(unused.validate().unwrap_err().to_string().contains("never uses"));
    }

    #[test]
    fn json_round_trip_preserves_bindings() {
        let config = two_step().build();
        let parsed = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.step("second").unwrap().source_for("prior"), Source::output("first"));
        assert_eq!(parsed.step("first").unwrap().source_for("theme"), Source::input("theme"));
    }

    #[test]
    fn search_detection_looks_inside_concat() {
        let source = Source::concat([Source::literal("a"), Source::search("{theme}")]);
        assert!(source.uses_search());
        assert!(!Source::output("x").uses_search());
    }

    #[test]
    fn model_ids_are_distinct_in_order() {
        let config = PipelineConfig::builder("p", "P")
            .step("a", "A").model("m2").template("x").done()
            .step("b", "B").model("m1").template("x").done()
            .step("c", "C").model("m2").template("x").done()
            .build();
        assert_eq!(config.model_ids(), vec!["m2", "m1"]);
    }
}
