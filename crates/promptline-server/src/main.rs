//! HTTP server entry point and Axum router setup.
//!
//! Loads settings from the environment, checks that every credential the
//! catalog needs is present, builds the shared state, and serves the app
//! catalog, pipeline runs, and idea-explorer sessions.

mod dto;
mod error;
mod handlers;
mod services;


use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use promptline_apps::{AppCatalog, AppDefinition, IdeaExplorer, SessionState};
use promptline_config::{builtin_models, ConfigError, Settings};
use promptline_core::{ModelConfig, Provider};
use promptline_llm::{TextGenerator, UnifiedLlmClient};
use promptline_tools::{default_backend, SearchBackend};
use tokio::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;

/// Idea-explorer sessions keyed by session ID, kept until deleted.
pub type SessionStore = RwLock<HashMap<String, Arc<Mutex<SessionState>>>>;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub catalog: AppCatalog,
    pub models: Vec<ModelConfig>,
    pub generator: Arc<dyn TextGenerator>,
    pub search: Arc<dyn SearchBackend>,
    pub explorer: IdeaExplorer,
    pub sessions: SessionStore,
}

impl ServerState {
    /// Builds the state around the given backends.
    pub fn new(
        catalog: AppCatalog,
        models: Vec<ModelConfig>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn SearchBackend>,
    ) -> Result<Self> {
        let conversation_model = catalog
            .apps()
            .iter()
            .find_map(|app| match &app.kind {
                promptline_apps::AppKind::Session { model } => Some(model.clone()),
                promptline_apps::AppKind::Pipeline(_) => None,
            })
            .context("catalog has no session app")?;
        let model = models
            .iter()
            .find(|m| m.id == conversation_model)
            .cloned()
            .with_context(|| format!("unknown conversation model '{}'", conversation_model))?;
        let explorer = IdeaExplorer::new(Arc::clone(&generator), model)?;

        Ok(Self {
            catalog,
            models,
            generator,
            search,
            explorer,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Gets an app by ID.
    pub fn get_app(&self, id: &str) -> Result<&AppDefinition, AppError> {
        self.catalog
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Unknown app: {}", id)))
    }

    /// Gets a session by ID.
    pub async fn session(&self, id: &str) -> Result<Arc<Mutex<SessionState>>, AppError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Unknown session: {}", id)))
    }
}

/// Providers whose credentials the catalog needs.
fn required_providers(catalog: &AppCatalog, models: &[ModelConfig]) -> Result<BTreeSet<Provider>, ConfigError> {
    catalog
        .model_ids()
        .into_iter()
        .map(|id| {
            models
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.provider)
                .ok_or_else(|| ConfigError::validation("catalog", format!("unknown model '{}'", id)))
        })
        .collect()
}

/// Builds the router with all routes and layers.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/apps", get(handlers::apps::list))
        .route("/apps/{id}", get(handlers::apps::get))
        .route("/apps/{id}/run", post(handlers::apps::run))
        .route("/models", get(handlers::models::list))
        .route("/sessions", post(handlers::sessions::create))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get).delete(handlers::sessions::delete),
        )
        .route("/sessions/{id}/brainstorm", post(handlers::sessions::brainstorm))
        .route("/sessions/{id}/ideas", post(handlers::sessions::add_idea))
        .route("/sessions/{id}/plan", post(handlers::sessions::plan))
        .route("/sessions/{id}/finalize", post(handlers::sessions::finalize))
        .route("/sessions/{id}/outputs", post(handlers::sessions::outputs))
        .route("/sessions/{id}/artifacts/{file}", get(handlers::sessions::artifact))
        .route("/sessions/{id}/reset", post(handlers::sessions::reset))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env();
    let state = Arc::new(init_server_state(&settings)?);
    let app = build_router(state);

    info!("Starting server on {}", settings.addr);

    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initializes the server state: model registry, credentials, and backends.
fn init_server_state(settings: &Settings) -> Result<ServerState> {
    let catalog = AppCatalog::builtin();
    let models = builtin_models(settings);

    let providers = required_providers(&catalog, &models)?;
    settings.require(providers.iter().copied())?;

    let generator = providers.iter().fold(UnifiedLlmClient::new(), |client, &provider| {
        match settings.credential(provider) {
            Some(key) => client.with_credential(provider, key),
            None => client,
        }
    });

    info!("Loaded {} apps", catalog.apps().len());
    for app in catalog.apps() {
        info!("  - {} ({})", app.title, app.id);
    }
    info!("Registered {} models", models.len());

    let search = default_backend(settings.tavily_api_key.clone());

    ServerState::new(catalog, models, Arc::new(generator), search)
}
