//! Web-search backends for promptline.
//!
//! Search-augmented pipeline steps send a plain-text query to a
//! [`SearchBackend`] and substitute the raw result text into their prompt.
//!
//! - [`DuckDuckGoSearch`] — HTML results page flattened to text, no credential
//! - [`WebSearchTool`] — Tavily search API (requires `TAVILY_API_KEY`)
//!
//! # Implementing a Custom Backend
//!
//! ```rust,ignore
//! use promptline_tools::{SearchBackend, ToolError};
//! use async_trait::async_trait;
//!
//! struct FixedSearch(String);
//!
//! #[async_trait]
//! impl SearchBackend for FixedSearch {
//!     fn name(&self) -> &str { "fixed" }
//!     async fn search(&self, _query: &str) -> Result<String, ToolError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

mod duckduckgo;
mod web_search;

pub use duckduckgo::DuckDuckGoSearch;
pub use web_search::WebSearchTool;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during a search.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Search backend returned an error.
    #[error("Search failed: {0}")]
    ExecutionFailed(String),

    /// Invalid arguments were passed to the backend.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// A web-search backend: plain-text query in, raw result text out.
///
/// No ranking, filtering, or deduplication is expected of implementations;
/// callers use the returned text verbatim.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Returns the backend name for logging.
    fn name(&self) -> &str;

    /// Runs the query and returns the result text.
    async fn search(&self, query: &str) -> Result<String, ToolError>;
}

/// Picks the search backend: Tavily when a key is supplied, DuckDuckGo otherwise.
pub fn default_backend(tavily_api_key: Option<String>) -> Arc<dyn SearchBackend> {
    match tavily_api_key {
        Some(key) => {
            info!("Search backend: tavily");
            Arc::new(WebSearchTool::new(key))
        }
        None => {
            info!("Search backend: duckduckgo");
            Arc::new(DuckDuckGoSearch::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backend_prefers_tavily_when_keyed() {
        assert_eq!(default_backend(Some("tvly-key".into())).name(), "tavily");
        assert_eq!(default_backend(None).name(), "duckduckgo");
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_network() {
        let err = DuckDuckGoSearch::new().search("   ").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
