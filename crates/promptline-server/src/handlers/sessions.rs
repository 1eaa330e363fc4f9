//! Idea-explorer session handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use promptline_apps::{Phase, SessionState};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::dto::{IdeaRequest, IdeaResponse, PlanRequest, PlanResponse, SessionView};
use crate::error::{AppError, AppJson};
use crate::ServerState;

fn view(id: String, state: &SessionState) -> SessionView {
    SessionView { id, state: state.clone() }
}

/// Creates a session in the home phase.
pub async fn create(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<SessionView>) {
    let id = Uuid::new_v4().to_string();
    let session = SessionState::new();
    let body = view(id.clone(), &session);

    state
        .sessions
        .write()
        .await
        .insert(id.clone(), Arc::new(Mutex::new(session)));
    info!("Created session {}", id);

    (StatusCode::CREATED, Json(body))
}

pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(&id).await?;
    let session = session.lock().await;
    Ok(Json(view(id, &session)))
}

/// Home → Brainstorming.
pub async fn brainstorm(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.start_brainstorming()?;
    Ok(Json(view(id, &session)))
}

pub async fn add_idea(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<IdeaRequest>,
) -> Result<Json<IdeaResponse>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    let feedback = state.explorer.add_idea(&mut session, &req.idea).await?;
    Ok(Json(IdeaResponse { feedback, session: view(id, &session) }))
}

pub async fn plan(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    let plan = state
        .explorer
        .generate_plan(&mut session, &req.steps, &req.milestones)
        .await?;
    Ok(Json(PlanResponse { plan, session: view(id, &session) }))
}

/// Closes the current phase: Brainstorming → Planning or Planning → Output.
pub async fn finalize(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    match session.phase {
        Phase::Brainstorming => session.finalize_brainstorming()?,
        _ => session.finalize_planning()?,
    }
    Ok(Json(view(id, &session)))
}

/// Generates the PRD and prototype description if missing.
pub async fn outputs(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    state.explorer.generate_outputs(&mut session).await?;
    Ok(Json(view(id, &session)))
}

/// Downloads a generated document as a text file.
pub async fn artifact(
    State(state): State<Arc<ServerState>>,
    Path((id, file)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session(&id).await?;
    let session = session.lock().await;
    let text = session.artifact(&file)?.to_string();

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file)),
        ],
        text,
    ))
}

/// Starts over: the session returns to its initial empty state.
pub async fn reset(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.start_over();
    info!("Session {} reset", id);
    Ok(Json(view(id, &session)))
}

/// Ends a session and frees its state.
pub async fn delete(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown session: {}", id)))?;
    info!("Deleted session {}", id);
    Ok(StatusCode::NO_CONTENT)
}
