//! Tool Registry
//!
//! Information Hiding:
//! - Tool storage and lookup implementation hidden
//! - Registration and discovery mechanisms abstracted

use super::{Tool, ToolMetadata};
use crate::search::SearchProvider;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_FILE_SIZE_BYTES: usize = 1024 * 1024;

/// Tool registry for managing available tools
///
/// An owned, mutable collection: the agent receives it through a builder
/// step and extends it explicitly rather than mutating a shared global.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name.clone();
        tracing::info!("Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all tool metadata
    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|tool| tool.metadata()).collect()
    }

    /// Get tool metadata as formatted string for LLM prompts
    pub fn tools_description(&self) -> String {
        let mut descriptions = Vec::new();
        for tool in self.tools.values() {
            let metadata = tool.metadata();
            let params = metadata
                .parameters
                .iter()
                .map(|p| {
                    let required = if p.required { "required" } else { "optional" };
                    format!(
                        "  - {} ({}): {} [{}]",
                        p.name, p.param_type, p.description, required
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            descriptions.push(format!(
                "Tool: {}\nDescription: {}\nParameters:\n{}",
                metadata.name, metadata.description, params
            ));
        }
        descriptions.join("\n\n")
    }

    /// Create the default registry: file tools, utility tools, web search
    pub fn with_defaults(provider: Arc<dyn SearchProvider>) -> Self {
        use crate::tools::filesystem::{
            CopyFileTool, DeleteFileTool, ListDirectoryTool, ReadFileTool, SearchFilesTool,
            WriteFileTool,
        };
        use crate::tools::search::WebSearchTool;
        use crate::tools::utility::{AppendLogTool, CurrentTimeTool, NotificationTool};

        let mut registry = Self::new();

        registry.register(Arc::new(ReadFileTool::new(MAX_FILE_SIZE_BYTES)));
        registry.register(Arc::new(WriteFileTool::new(MAX_FILE_SIZE_BYTES)));
        registry.register(Arc::new(ListDirectoryTool::new()));
        registry.register(Arc::new(CopyFileTool::new()));
        registry.register(Arc::new(DeleteFileTool::new()));
        registry.register(Arc::new(SearchFilesTool::new()));
        registry.register(Arc::new(CurrentTimeTool::new()));
        registry.register(Arc::new(NotificationTool::new()));
        registry.register(Arc::new(AppendLogTool::new()));
        registry.register(Arc::new(WebSearchTool::new(provider)));

        registry
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DuckDuckGoProvider;
    use crate::tools::utility::CurrentTimeTool;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CurrentTimeTool::new()));

        assert!(registry.has_tool("get_current_time"));
        assert!(registry.get("get_current_time").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ToolRegistry::with_defaults(Arc::new(DuckDuckGoProvider::new()));

        for name in [
            "read_file",
            "write_file",
            "list_directory",
            "copy_file",
            "delete_file",
            "search_files",
            "get_current_time",
            "send_notification",
            "append_to_log",
            "web_search",
        ] {
            assert!(registry.has_tool(name), "missing default tool: {}", name);
        }
        assert_eq!(registry.list_tools().len(), 10);
    }

    #[test]
    fn test_tools_description() {
        let registry = ToolRegistry::with_defaults(Arc::new(DuckDuckGoProvider::new()));
        let description = registry.tools_description();

        assert!(description.contains("web_search"));
        assert!(description.contains("read_file"));
        assert!(description.contains("Description:"));
        assert!(description.contains("Parameters:"));
    }
}
