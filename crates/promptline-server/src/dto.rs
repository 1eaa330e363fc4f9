//! Data transfer objects for HTTP message serialization.

use std::collections::HashMap;

use promptline_apps::{AppDefinition, AppKind, FormSpec, SessionState, Submission};
use serde::{Deserialize, Serialize};

// === App Catalog Types ===

/// Step information for API responses.
#[derive(Debug, Serialize)]
pub struct StepInfo {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub model: String,
    pub search: bool,
}

/// App descriptor for API responses.
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `pipeline` or `session`.
    pub kind: &'static str,
    pub form: FormSpec,
    pub steps: Vec<StepInfo>,
}

impl From<&AppDefinition> for AppInfo {
    fn from(app: &AppDefinition) -> Self {
        let (kind, steps) = match &app.kind {
            AppKind::Pipeline(pipeline) => (
                "pipeline",
                pipeline
                    .steps
                    .iter()
                    .map(|s| StepInfo {
                        id: s.id.clone(),
                        label: s.label.clone(),
                        stage: s.stage.clone(),
                        model: s.model.clone(),
                        search: s.is_search_augmented(),
                    })
                    .collect(),
            ),
            AppKind::Session { .. } => ("session", Vec::new()),
        };

        Self {
            id: app.id.clone(),
            title: app.title.clone(),
            description: app.description.clone(),
            kind,
            form: app.form.clone(),
            steps,
        }
    }
}

// === Run Types ===

/// Request body for running a pipeline app.
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub inputs: Submission,
    /// Per-request model overrides keyed by step ID.
    #[serde(default)]
    pub step_models: HashMap<String, String>,
}

/// Data of an SSE `error` event.
#[derive(Debug, Serialize)]
pub struct RunError {
    pub error: String,
}

// === Session Types ===

/// Session snapshot.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub state: SessionState,
}

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    pub idea: String,
}

#[derive(Debug, Serialize)]
pub struct IdeaResponse {
    pub feedback: String,
    pub session: SessionView,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub milestones: String,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: String,
    pub session: SessionView,
}
