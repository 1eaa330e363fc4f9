//! App catalog and pipeline run handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use tracing::info;

use crate::dto::{AppInfo, RunRequest};
use crate::error::{AppError, AppJson};
use crate::services;
use crate::ServerState;

/// Lists every app in the catalog.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<Vec<AppInfo>> {
    Json(state.catalog.apps().iter().map(AppInfo::from).collect())
}

/// Returns one app descriptor.
pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<AppInfo>, AppError> {
    Ok(Json(AppInfo::from(state.get_app(&id)?)))
}

/// Validates the form and streams the pipeline run.
///
/// Validation and configuration errors are returned as JSON before the stream opens.
pub async fn run(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<RunRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let app = state.get_app(&id)?;
    let pipeline = app
        .pipeline_config()
        .ok_or_else(|| AppError::BadRequest(format!("App '{}' runs in a session; use /sessions", id)))?;

    let inputs = app.form.validate(&req.inputs)?;
    let engine = services::run::build_engine(&state, pipeline, req.step_models)?;

    info!("Run request for '{}' ({} steps)", id, pipeline.steps.len());
    Ok(services::run::stream(engine, inputs))
}
