//! HTTP route handlers for the promptline server.

pub mod apps;
pub mod models;
pub mod sessions;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
