//! The application catalog.

use std::collections::HashSet;

use promptline_config::{model_ids, PipelineConfig};

use crate::forms::{FieldSpec, FormSpec};
use crate::{book, content, legal, stock};

/// How an app runs.
#[derive(Debug, Clone)]
pub enum AppKind {
    /// A fixed pipeline run once per form submission.
    Pipeline(PipelineConfig),
    /// A phased conversation held in a server-side session.
    Session {
        /// Model ID of the conversation model.
        model: String,
    },
}

/// One entry in the catalog.
#[derive(Debug, Clone)]
pub struct AppDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub form: FormSpec,
    pub kind: AppKind,
}

impl AppDefinition {
    /// Creates a pipeline app; ID and description come from the pipeline.
    pub fn pipeline(title: &str, form: FormSpec, pipeline: PipelineConfig) -> Self {
        Self {
            id: pipeline.id.clone(),
            title: title.to_string(),
            description: pipeline.description.clone(),
            form,
            kind: AppKind::Pipeline(pipeline),
        }
    }

    /// Returns the pipeline for pipeline apps.
    pub fn pipeline_config(&self) -> Option<&PipelineConfig> {
        match &self.kind {
            AppKind::Pipeline(p) => Some(p),
            AppKind::Session { .. } => None,
        }
    }

    /// Returns the model IDs this app calls.
    pub fn model_ids(&self) -> Vec<&str> {
        match &self.kind {
            AppKind::Pipeline(p) => p.model_ids(),
            AppKind::Session { model } => vec![model.as_str()],
        }
    }
}

pub fn idea_explorer() -> AppDefinition {
    AppDefinition {
        id: "idea-explorer".into(),
        title: "AI Module Idea Explorer".into(),
        description: "Brainstorm project ideas, plan them, and produce a PRD and a prototype description".into(),
        form: FormSpec::new(vec![
            FieldSpec::text("idea", "Your AI project idea"),
            FieldSpec::textarea("steps", "Actionable steps"),
            FieldSpec::textarea("milestones", "Project milestones"),
        ]),
        kind: AppKind::Session { model: model_ids::CLAUDE_CONVERSATION.to_string() },
    }
}

/// The set of apps served.
#[derive(Debug, Clone, Default)]
pub struct AppCatalog {
    apps: Vec<AppDefinition>,
}

impl AppCatalog {
    pub fn new(apps: Vec<AppDefinition>) -> Self {
        Self { apps }
    }

    /// All built-in apps.
    pub fn builtin() -> Self {
        Self::new(vec![
            legal::new_lawsuit(),
            legal::existing_lawsuit(),
            legal::power_of_attorney(),
            legal::declaration_of_poverty(),
            book::book(),
            content::content(),
            stock::stock_report(),
            idea_explorer(),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&AppDefinition> {
        self.apps.iter().find(|a| a.id == id)
    }

    pub fn apps(&self) -> &[AppDefinition] {
        &self.apps
    }

    /// Distinct model IDs used across the catalog, in first-use order.
    pub fn model_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.apps
            .iter()
            .flat_map(|a| a.model_ids())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_ids_are_unique_and_pipelines_validate() {
        let catalog = AppCatalog::builtin();
        let ids: Vec<_> = catalog.apps().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "new-lawsuit",
                "existing-lawsuit",
                "power-of-attorney",
                "declaration-of-poverty",
                "book",
                "content",
                "stock-report",
                "idea-explorer",
            ]
        );

        for app in catalog.apps() {
            if let Some(p) = app.pipeline_config() {
                p.validate().unwrap();
                let inputs: HashSet<_> = p.inputs.iter().collect();
                assert!(app.form.fields.iter().all(|f| inputs.contains(&f.name)), "{}", app.id);
            }
        }
    }

    #[test]
    fn catalog_models_cover_groq_and_conversation() {
        let catalog = AppCatalog::builtin();
        let models = catalog.model_ids();
        assert!(models.contains(&model_ids::LLAMA3_70B));
        assert!(models.contains(&model_ids::LLAMA3_8B_TOOL_USE));
        assert!(models.contains(&model_ids::CLAUDE_CONVERSATION));
        assert_eq!(models.iter().filter(|m| **m == model_ids::LLAMA3_70B).count(), 1);
    }
}
