//! Tavily search provider (higher quality, requires an API key)

use super::SearchProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug)]
pub struct TavilyProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str, num_results: usize) -> Result<String> {
        tracing::info!("[Tavily] Searching for: {}", query);

        let response = self
            .client
            .post(format!("{}/search", self.base_url.trim_end_matches('/')))
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": num_results,
            }))
            .send()
            .await
            .context("Tavily request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Tavily returned status {}", status));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .context("Failed to decode Tavily response")?;

        if body.results.is_empty() {
            return Ok(format!("No results found for '{}'", query));
        }

        let formatted: Vec<String> = body
            .results
            .iter()
            .take(num_results)
            .map(|r| format!("- {}: {}", r.title, r.content))
            .collect();

        Ok(format!(
            "Search results for '{}':\n{}",
            query,
            formatted.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_formats_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({"query": "rust async"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "Tokio", "content": "An async runtime for Rust."},
                    {"title": "async-std", "content": "Another async runtime."}
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = TavilyProvider::new("test-key".to_string()).with_base_url(mock_server.uri());
        let result = provider.search("rust async", 2).await.unwrap();

        assert!(result.starts_with("Search results for 'rust async':"));
        assert!(result.contains("- Tokio: An async runtime for Rust."));
        assert!(result.contains("- async-std"));
    }

    #[tokio::test]
    async fn test_search_truncates_to_requested_count() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "One", "content": "first"},
                    {"title": "Two", "content": "second"},
                    {"title": "Three", "content": "third"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = TavilyProvider::new("test-key".to_string()).with_base_url(mock_server.uri());
        let result = provider.search("anything", 2).await.unwrap();

        assert!(result.contains("- One"));
        assert!(result.contains("- Two"));
        assert!(!result.contains("- Three"));
    }

    #[tokio::test]
    async fn test_auth_failure_is_err() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let provider = TavilyProvider::new("bad-key".to_string()).with_base_url(mock_server.uri());
        let err = provider.search("anything", 3).await.unwrap_err();

        assert!(err.to_string().contains("status"));
    }
}
