//! Model registry handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use promptline_core::ModelConfig;

use crate::ServerState;

/// Lists the registered models.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<Vec<ModelConfig>> {
    Json(state.models.clone())
}
