//! Built-in promptline apps.
//!
//! - [`AppCatalog`] — Every app served, looked up by ID
//! - [`FormSpec`] — The form an app collects, and submission validation
//! - [`IdeaExplorer`] / [`SessionState`] — The phased, session-based idea explorer
//!
//! Pipeline apps are plain [`promptline_config::PipelineConfig`] values:
//! run them with `promptline_engine::PipelineEngine` after validating the form.
//!
//! ```rust,ignore
//! let app = AppCatalog::builtin().get("stock-report").unwrap();
//! let inputs = app.form.validate(&submission)?;
//! let engine = PipelineEngine::new(app.pipeline_config().unwrap().clone(), models, llm, search, HashMap::new())?;
//! let run = engine.execute(inputs).await?;
//! ```

mod book;
mod catalog;
mod content;
mod forms;
mod ideas;
mod legal;
mod session;
mod stock;

pub use book::CHAPTER_RANGES;
pub use catalog::{idea_explorer, AppCatalog, AppDefinition, AppKind};
pub use forms::{FieldKind, FieldSpec, FormSpec, FormValue, Submission, NO_DOCUMENTS};
pub use ideas::IdeaExplorer;
pub use session::{Artifact, Idea, Phase, SessionState, Turn};
