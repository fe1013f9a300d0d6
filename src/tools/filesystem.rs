//! Filesystem Tools
//!
//! Information Hiding:
//! - File I/O implementation details hidden
//! - Glob-to-regex translation hidden in the search tool
//! - Error handling for file operations abstracted

use super::{Tool, ToolError, ToolMetadata, ToolResult};
use crate::{tool_metadata, tool_result, validate_optional_string, validate_required_string};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Read file tool
pub struct ReadFileTool {
    max_size_bytes: usize,
}

impl ReadFileTool {
    pub fn new(max_size_bytes: usize) -> Self {
        Self { max_size_bytes }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "read_file",
            description: "Read the contents of a file from the filesystem.",
            parameters: [
                {
                    name: "path",
                    type: "string",
                    description: "The file path to read",
                    required: true
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let path_str = validate_required_string!(args, "path");

        if path_str.is_empty() {
            return Err(anyhow::anyhow!("Path cannot be empty"));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let path_str = validate_required_string!(args, "path");
        let path = Path::new(path_str);

        tracing::info!("Reading file: {}", path_str);

        if !path.exists() {
            return tool_result!(failure: ToolError::NotFound(format!(
                "File not found at {}",
                path_str
            )));
        }

        match fs::metadata(path).await {
            Ok(metadata) => {
                let size = metadata.len() as usize;
                if size > self.max_size_bytes {
                    return tool_result!(failure: ToolError::InvalidInput(format!(
                        "File too large: {} bytes (max: {} bytes)",
                        size, self.max_size_bytes
                    )));
                }
            }
            Err(e) => {
                return tool_result!(failure: ToolError::Io(format!(
                    "Failed to read file metadata: {}",
                    e
                )))
            }
        }

        match fs::read_to_string(path).await {
            Ok(contents) => tool_result!(success: contents),
            Err(e) => tool_result!(failure: ToolError::Io(format!("Failed to read file: {}", e))),
        }
    }
}

/// Write file tool - creates parent directories as needed
pub struct WriteFileTool {
    max_size_bytes: usize,
}

impl WriteFileTool {
    pub fn new(max_size_bytes: usize) -> Self {
        Self { max_size_bytes }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "write_file",
            description: "Write content to a file on the filesystem.",
            parameters: [
                {
                    name: "path",
                    type: "string",
                    description: "The file path to write to",
                    required: true
                },
                {
                    name: "content",
                    type: "string",
                    description: "The content to write",
                    required: true
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let path_str = validate_required_string!(args, "path");
        let content = validate_required_string!(args, "content");

        if path_str.is_empty() {
            return Err(anyhow::anyhow!("Path cannot be empty"));
        }

        if content.len() > self.max_size_bytes {
            return Err(anyhow::anyhow!(
                "Content too large: {} bytes (max: {} bytes)",
                content.len(),
                self.max_size_bytes
            ));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let path_str = validate_required_string!(args, "path");
        let content = validate_required_string!(args, "content");
        let path = Path::new(path_str);

        tracing::info!("Writing to file: {}", path_str);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return tool_result!(failure: ToolError::Io(format!(
                        "Failed to create directory: {}",
                        e
                    )));
                }
            }
        }

        match fs::write(path, content).await {
            Ok(_) => tool_result!(success: format!("Successfully wrote to {}", path_str)),
            Err(e) => tool_result!(failure: ToolError::Io(format!("Failed to write file: {}", e))),
        }
    }
}

/// List directory tool
pub struct ListDirectoryTool;

impl ListDirectoryTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListDirectoryTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "list_directory",
            description: "List all files and directories at the given path.",
            parameters: [
                {
                    name: "path",
                    type: "string",
                    description: "Directory path (defaults to current directory)",
                    required: false
                }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let path_str = validate_optional_string!(args, "path", ".");
        let path = Path::new(path_str);

        tracing::info!("Listing directory: {}", path_str);

        if !path.exists() {
            return tool_result!(failure: ToolError::NotFound(format!(
                "Directory not found at {}",
                path_str
            )));
        }

        let mut entries = match fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) => {
                return tool_result!(failure: ToolError::Io(format!(
                    "Failed to list directory: {}",
                    e
                )))
            }
        };

        let mut lines = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    let is_dir = entry
                        .file_type()
                        .await
                        .map(|t| t.is_dir())
                        .unwrap_or(false);
                    let prefix = if is_dir { "DIR  " } else { "FILE " };
                    lines.push(format!("{}{}", prefix, name));
                }
                Ok(None) => break,
                Err(e) => {
                    return tool_result!(failure: ToolError::Io(format!(
                        "Failed to read directory entry: {}",
                        e
                    )))
                }
            }
        }

        lines.sort();
        tool_result!(success: lines.join("\n"))
    }
}

/// Copy file tool - creates the destination's parent directory as needed
pub struct CopyFileTool;

impl CopyFileTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CopyFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CopyFileTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "copy_file",
            description: "Copy a file from a source path to a destination path.",
            parameters: [
                {
                    name: "source",
                    type: "string",
                    description: "The file to copy",
                    required: true
                },
                {
                    name: "destination",
                    type: "string",
                    description: "Where to copy the file",
                    required: true
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let source = validate_required_string!(args, "source");
        let destination = validate_required_string!(args, "destination");

        if source.is_empty() || destination.is_empty() {
            return Err(anyhow::anyhow!("Source and destination cannot be empty"));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let source = validate_required_string!(args, "source");
        let destination = validate_required_string!(args, "destination");

        tracing::info!("Copying {} to {}", source, destination);

        if !Path::new(source).exists() {
            return tool_result!(failure: ToolError::NotFound(format!(
                "File not found at {}",
                source
            )));
        }

        if let Some(parent) = Path::new(destination).parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return tool_result!(failure: ToolError::Io(format!(
                        "Failed to create directory: {}",
                        e
                    )));
                }
            }
        }

        match fs::copy(source, destination).await {
            Ok(_) => {
                tool_result!(success: format!("Successfully copied {} to {}", source, destination))
            }
            Err(e) => tool_result!(failure: ToolError::Io(format!("Failed to copy file: {}", e))),
        }
    }
}

/// Delete file tool - missing files report not-found instead of erroring
pub struct DeleteFileTool;

impl DeleteFileTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeleteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "delete_file",
            description: "Delete a file at the given path.",
            parameters: [
                {
                    name: "path",
                    type: "string",
                    description: "The file path to delete",
                    required: true
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let path_str = validate_required_string!(args, "path");

        if path_str.is_empty() {
            return Err(anyhow::anyhow!("Path cannot be empty"));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let path_str = validate_required_string!(args, "path");
        let path = Path::new(path_str);

        tracing::info!("Deleting file: {}", path_str);

        if !path.exists() {
            return tool_result!(failure: ToolError::NotFound(format!(
                "File not found at {}",
                path_str
            )));
        }

        match fs::remove_file(path).await {
            Ok(_) => tool_result!(success: format!("Successfully deleted {}", path_str)),
            Err(e) => tool_result!(failure: ToolError::Io(format!("Failed to delete file: {}", e))),
        }
    }
}

/// Search files tool - glob pattern over a single directory
pub struct SearchFilesTool;

impl SearchFilesTool {
    pub fn new() -> Self {
        Self
    }

    /// Translate a shell glob into an anchored regex.
    fn glob_to_regex(pattern: &str) -> Result<Regex> {
        let mut regex = String::with_capacity(pattern.len() + 2);
        regex.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => regex.push_str(".*"),
                '?' => regex.push('.'),
                c if "\\.+()[]{}^$|".contains(c) => {
                    regex.push('\\');
                    regex.push(c);
                }
                c => regex.push(c),
            }
        }
        regex.push('$');
        Regex::new(&regex).map_err(|e| anyhow::anyhow!("Invalid pattern '{}': {}", pattern, e))
    }
}

impl Default for SearchFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchFilesTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "search_files",
            description: "Find files in a directory whose names match a glob pattern (e.g. '*.txt').",
            parameters: [
                {
                    name: "directory",
                    type: "string",
                    description: "The directory to search in",
                    required: true
                },
                {
                    name: "pattern",
                    type: "string",
                    description: "Glob pattern to match file names against",
                    required: true
                }
            ]
        }
    }

    fn validate(&self, args: &Value) -> Result<()> {
        let directory = validate_required_string!(args, "directory");
        let pattern = validate_required_string!(args, "pattern");

        if directory.is_empty() || pattern.is_empty() {
            return Err(anyhow::anyhow!("Directory and pattern cannot be empty"));
        }

        Ok(())
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        self.validate(&args)?;

        let directory = validate_required_string!(args, "directory");
        let pattern = validate_required_string!(args, "pattern");

        tracing::info!("Searching for '{}' in {}", pattern, directory);

        if !Path::new(directory).exists() {
            return tool_result!(failure: ToolError::NotFound(format!(
                "Directory not found at {}",
                directory
            )));
        }

        let matcher = match Self::glob_to_regex(pattern) {
            Ok(m) => m,
            Err(e) => return tool_result!(failure: ToolError::InvalidInput(e.to_string())),
        };

        let mut entries = match fs::read_dir(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                return tool_result!(failure: ToolError::Io(format!(
                    "Failed to read directory: {}",
                    e
                )))
            }
        };

        let mut matches = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file && matcher.is_match(&name) {
                matches.push(name);
            }
        }
        matches.sort();

        if matches.is_empty() {
            tool_result!(success: format!(
                "No files matching '{}' in {}",
                pattern, directory
            ))
        } else {
            tool_result!(success: format!(
                "Found {} file(s) matching '{}' in {}:\n{}",
                matches.len(),
                pattern,
                directory,
                matches.join("\n")
            ))
        }
    }
}
