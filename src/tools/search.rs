//! Web Search Tool - adapter over the configured search provider

use super::{Tool, ToolError, ToolMetadata, ToolResult};
use crate::search::SearchProvider;
use crate::{tool_metadata, tool_result, validate_optional_number, validate_required_string};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const DEFAULT_NUM_RESULTS: i64 = 3;

/// Web search tool - the provider is chosen once at startup
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "web_search",
            description: "Search the web for current information.",
            parameters: [
                {
                    name: "query",
                    type: "string",
                    description: "Search query",
                    required: true
                },
                {
                    name: "num_results",
                    type: "number",
                    description: "Number of results to return (default: 3)",
                    required: false
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let query = validate_required_string!(args, "query");

        if query.is_empty() {
            return Err(anyhow::anyhow!("Query cannot be empty"));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let query = validate_required_string!(args, "query");
        let num_results = validate_optional_number!(args, "num_results", DEFAULT_NUM_RESULTS);
        let num_results = num_results.max(1) as usize;

        tracing::info!(
            "Searching web via {} for: {}",
            self.provider.name(),
            query
        );

        match self.provider.search(query, num_results).await {
            Ok(results) => tool_result!(success: results),
            Err(e) => tool_result!(failure: ToolError::Network(format!("Search failed: {:#}", e))),
        }
    }
}
