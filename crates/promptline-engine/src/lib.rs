//! Pipeline execution engine for promptline.
//!
//! This crate runs a [`PipelineConfig`] against a text-generation backend
//! and a search backend:
//!
//! - [`PipelineEngine`] — Executes a pipeline's steps in declared order
//! - [`ModelResolver`] — Resolves model IDs to configurations
//! - [`OutputBlock`] — One step's raw result, as shown to the user
//! - [`RunEvent`] — Progress events pushed while a run is in flight
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptline_engine::PipelineEngine;
//!
//! let engine = PipelineEngine::new(
//!     config,
//!     builtin_models(&settings),
//!     Arc::new(UnifiedLlmClient::new()),
//!     default_backend(None),
//!     HashMap::new(), // step model overrides
//! )?;
//!
//! let run = engine.execute(inputs).await?;
//! for block in &run.blocks {
//!     println!("{}\n{}", block.label, block.response);
//! }
//! ```
//!
//! # Execution Model
//!
//! Steps run one at a time. For each step the engine resolves every
//! placeholder of its template (form inputs, earlier outputs, web searches,
//! literals), renders the prompt, and awaits one backend call. Step K sees
//! the form inputs and the outputs of steps 1..K-1, nothing else. The first
//! failure aborts the run; blocks already emitted stay with the caller.

mod step;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use promptline_config::{ConfigError, PipelineConfig};
use promptline_core::{ModelConfig, PipelineError, PromptTemplate};
use promptline_llm::TextGenerator;
use promptline_tools::SearchBackend;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Form values keyed by input name.
pub type Inputs = HashMap<String, String>;

/// Raw search result attached to the step that used it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Placeholder the result was substituted into.
    pub placeholder: String,
    /// The query as sent to the search backend.
    pub query: String,
    /// Raw result text, unfiltered.
    pub text: String,
}

/// One step's result.
///
/// `response` is the backend's raw text; it is never parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputBlock {
    /// Zero-based position of the step in the pipeline.
    pub index: usize,
    pub step_id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// ID of the model that produced the response.
    pub model: String,
    /// The filled prompt that was sent.
    pub prompt: String,
    pub response: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub searches: Vec<SearchHit>,
    pub elapsed_ms: u64,
}

/// A completed run: every block in step order.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub pipeline_id: String,
    pub blocks: Vec<OutputBlock>,
    pub elapsed_ms: u64,
}

impl PipelineRun {
    /// Returns the raw output of a step by ID.
    pub fn output(&self, step_id: &str) -> Option<&str> {
        self.blocks
            .iter()
            .find(|b| b.step_id == step_id)
            .map(|b| b.response.as_str())
    }

    /// Returns the block of the last step.
    pub fn last(&self) -> Option<&OutputBlock> {
        self.blocks.last()
    }
}

/// Progress event emitted while a pipeline runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A step is about to resolve its inputs and call the backend.
    StepStarted {
        index: usize,
        step_id: String,
        label: String,
    },
    /// A step finished; its block is final.
    Block(OutputBlock),
    /// All steps finished.
    Finished { elapsed_ms: u64 },
}

/// Resolves model IDs to their configurations.
pub struct ModelResolver {
    models: HashMap<String, ModelConfig>,
}

impl ModelResolver {
    /// Creates a resolver over the available models.
    pub fn new(models: Vec<ModelConfig>) -> Self {
        let map = models.into_iter().map(|m| (m.id.clone(), m)).collect();
        Self { models: map }
    }

    /// Resolves a model ID to its config.
    pub fn resolve(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models.get(model_id)
    }
}

/// Core pipeline execution engine.
///
/// Construction validates the pipeline and compiles every template, so a
/// misconfigured pipeline is rejected before any remote call is made.
pub struct PipelineEngine {
    config: PipelineConfig,
    templates: Vec<PromptTemplate>,
    resolver: ModelResolver,
    step_overrides: HashMap<String, String>,
    generator: Arc<dyn TextGenerator>,
    search: Arc<dyn SearchBackend>,
}

impl PipelineEngine {
    /// Creates an engine for the pipeline.
    ///
    /// `step_overrides` maps step IDs to model IDs for this engine only.
    pub fn new(
        config: PipelineConfig,
        models: Vec<ModelConfig>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn SearchBackend>,
        step_overrides: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let resolver = ModelResolver::new(models);
        if let Some(step) = config.steps.iter().find(|s| resolver.resolve(&s.model).is_none()) {
            return Err(ConfigError::validation(
                &config.id,
                format!("step '{}' uses unknown model '{}'", step.id, step.model),
            ));
        }

        let templates = config
            .steps
            .iter()
            .map(|s| s.compile())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            templates,
            resolver,
            step_overrides,
            generator,
            search,
        })
    }

    /// Returns the pipeline this engine runs.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Gets the model for a step, considering overrides.
    fn step_model(&self, step_id: &str, default_id: &str) -> &ModelConfig {
        if let Some(id) = self.step_overrides.get(step_id) {
            match self.resolver.resolve(id) {
                Some(model) => return model,
                None => warn!("║     ⚠ Unknown override model '{}' for step '{}', using default", id, step_id),
            }
        }
        // Every default model was resolved in `new`.
        &self.resolver.models[default_id]
    }

    /// Runs every step and returns the completed run.
    pub async fn execute(&self, inputs: Inputs) -> Result<PipelineRun, PipelineError> {
        self.run(inputs, None).await
    }

    /// Runs every step, pushing a [`RunEvent`] for each step as it starts and finishes.
    ///
    /// A dropped receiver does not stop the run.
    pub async fn execute_with_events(
        &self,
        inputs: Inputs,
        events: &mpsc::Sender<RunEvent>,
    ) -> Result<PipelineRun, PipelineError> {
        self.run(inputs, Some(events)).await
    }

    async fn run(
        &self,
        inputs: Inputs,
        events: Option<&mpsc::Sender<RunEvent>>,
    ) -> Result<PipelineRun, PipelineError> {
        let start = Instant::now();
        let total = self.config.steps.len();

        info!("╔══════════════════════════════════════════════════════════════");
        info!("║ PIPELINE: {}", self.config.name);
        info!("║ Inputs: {:?}", self.config.inputs);
        info!("║ Steps: {}", total);
        if !self.step_overrides.is_empty() {
            info!("║ Step model overrides: {:?}", self.step_overrides);
        }
        info!("╠══════════════════════════════════════════════════════════════");

        let mut outputs: HashMap<String, String> = HashMap::new();
        let mut blocks = Vec::with_capacity(total);

        for (index, (step, template)) in self.config.steps.iter().zip(&self.templates).enumerate() {
            emit(
                events,
                RunEvent::StepStarted {
                    index,
                    step_id: step.id.clone(),
                    label: step.label.clone(),
                },
            )
            .await;

            let model = self.step_model(&step.id, &step.model);
            info!("╠──────────────────────────────────────────────────────────────");
            info!("║ [{}/{}] STEP: {} ({})", index + 1, total, step.label, step.id);
            info!("║     Model: {}", model.name);

            let block = match step::fill_and_invoke(
                index,
                step,
                template,
                model,
                &inputs,
                &outputs,
                self.generator.as_ref(),
                self.search.as_ref(),
            )
            .await
            {
                Ok(block) => block,
                Err(e) => {
                    warn!("║     ✗ Step '{}' failed: {}", step.id, e);
                    info!("╚══════════════════════════════════════════════════════════════");
                    return Err(e);
                }
            };

            info!("║     ✓ Completed in {}ms, {} chars", block.elapsed_ms, block.response.len());

            outputs.insert(step.id.clone(), block.response.clone());
            emit(events, RunEvent::Block(block.clone())).await;
            blocks.push(block);
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!("║ Pipeline complete in {}ms", elapsed_ms);
        info!("╚══════════════════════════════════════════════════════════════");

        emit(events, RunEvent::Finished { elapsed_ms }).await;

        Ok(PipelineRun {
            pipeline_id: self.config.id.clone(),
            blocks,
            elapsed_ms,
        })
    }
}

async fn emit(events: Option<&mpsc::Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
