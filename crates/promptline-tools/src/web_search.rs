use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{SearchBackend, ToolError};

const TAVILY_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: u32 = 5;

/// Web search tool using Tavily API
pub struct WebSearchTool {
    api_key: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
}

/// Formats Tavily results as readable text, in the order returned.
fn format_results(response: &TavilyResponse) -> String {
    let mut output = String::new();

    if let Some(answer) = &response.answer {
        output.push_str(&format!("Summary: {}\n\n", answer));
    }

    for (i, result) in response.results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {}\n   URL: {}\n   {}\n\n",
            i + 1,
            result.title,
            result.url,
            result.content
        ));
    }

    output
}

#[async_trait]
impl SearchBackend for WebSearchTool {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        if query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("Empty search query".to_string()));
        }

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
            search_depth: "basic",
        };

        let response = self.client.post(TAVILY_URL).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::ExecutionFailed(format!(
                "Tavily API error: {} - {}",
                status, body
            )));
        }

        let tavily_response: TavilyResponse = response.json().await.map_err(|e| {
            ToolError::ExecutionFailed(format!("Failed to parse Tavily response: {}", e))
        })?;

        Ok(format_results(&tavily_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_answer_then_numbered_results() {
        let response: TavilyResponse = serde_json::from_str(
            r#"{
                "answer": "Solar is growing.",
                "results": [
                    {"title": "A", "url": "https://a.example", "content": "alpha", "score": 0.9},
                    {"title": "B", "url": "https://b.example", "content": "beta", "score": 0.1}
                ]
            }"#,
        )
        .unwrap();

        let text = format_results(&response);
        assert!(text.starts_with("Summary: Solar is growing."));
        let a = text.find("1. A").unwrap();
        let b = text.find("2. B").unwrap();
        assert!(a < b);
        assert!(text.contains("URL: https://b.example"));
    }
}
