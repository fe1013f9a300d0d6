//! DuckDuckGo search provider (instant-answer API, no API key)

use super::SearchProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com";

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
}

#[derive(Debug)]
pub struct DuckDuckGoProvider {
    client: Client,
    base_url: String,
}

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, num_results: usize) -> Result<String> {
        tracing::info!("[DuckDuckGo] Searching for: {}", query);

        let response = self
            .client
            .get(format!("{}/", self.base_url.trim_end_matches('/')))
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .context("DuckDuckGo request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("DuckDuckGo returned status {}", status));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .context("Failed to decode DuckDuckGo response")?;

        let mut lines = Vec::new();
        if !answer.abstract_text.is_empty() {
            lines.push(answer.abstract_text);
        }
        for topic in answer.related_topics {
            if lines.len() >= num_results {
                break;
            }
            if !topic.text.is_empty() {
                lines.push(format!("- {}", topic.text));
            }
        }

        if lines.is_empty() {
            return Ok(format!("No results found for '{}'", query));
        }

        Ok(format!(
            "Search results for '{}':\n{}",
            query,
            lines.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_formats_abstract_and_topics() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "rust language"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "AbstractText": "Rust is a systems programming language.",
                "RelatedTopics": [
                    {"Text": "Rust (video game)"},
                    {"Text": "Rust Belt"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = DuckDuckGoProvider::new().with_base_url(mock_server.uri());
        let result = provider.search("rust language", 3).await.unwrap();

        assert!(result.starts_with("Search results for 'rust language':"));
        assert!(result.contains("systems programming language"));
        assert!(result.contains("- Rust (video game)"));
    }

    #[tokio::test]
    async fn test_search_empty_answer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "AbstractText": "",
                "RelatedTopics": []
            })))
            .mount(&mock_server)
            .await;

        let provider = DuckDuckGoProvider::new().with_base_url(mock_server.uri());
        let result = provider.search("obscure query", 3).await.unwrap();

        assert!(result.contains("No results found"));
    }

    #[tokio::test]
    async fn test_search_error_status_is_err() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = DuckDuckGoProvider::new().with_base_url(mock_server.uri());
        let err = provider.search("anything", 3).await.unwrap_err();

        assert!(err.to_string().contains("status"));
    }
}
