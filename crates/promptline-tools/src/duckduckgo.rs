use async_trait::async_trait;
use tracing::debug;

use crate::{SearchBackend, ToolError};

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const TEXT_WIDTH: usize = 120;

/// Web search through DuckDuckGo's HTML endpoint.
///
/// The results page is flattened to plain text and returned whole.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; PromptlineBot/1.0)")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        if query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("Empty search query".to_string()));
        }

        let response = self
            .client
            .get(DUCKDUCKGO_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "DuckDuckGo error: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        debug!("DuckDuckGo returned {} bytes of HTML", body.len());

        Ok(html2text::from_read(body.as_bytes(), TEXT_WIDTH))
    }
}
