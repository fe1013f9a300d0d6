//! Utility Tools - time, notifications, log appending

use super::{Tool, ToolError, ToolMetadata, ToolResult};
use crate::{tool_metadata, tool_result, validate_optional_string, validate_required_string};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current time tool
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrentTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "get_current_time",
            description: "Get the current date and time.",
            parameters: []
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult> {
        tool_result!(success: Local::now().format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Notification tool
///
/// Currently writes to the console. Can be extended to Slack/email sinks.
pub struct NotificationTool;

impl NotificationTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotificationTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for NotificationTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "send_notification",
            description: "Send a notification message to the user.",
            parameters: [
                {
                    name: "message",
                    type: "string",
                    description: "The notification text",
                    required: true
                }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let message = validate_required_string!(args, "message");

        println!("[NOTIFICATION] {}", message);
        tracing::info!("Notification sent: {}", message);

        tool_result!(success: format!("Notification sent: {}", message))
    }
}

/// Append-to-log tool - timestamped lines, appended (never truncated)
pub struct AppendLogTool;

impl AppendLogTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AppendLogTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for AppendLogTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "append_to_log",
            description: "Append a message with a timestamp to a log file.",
            parameters: [
                {
                    name: "message",
                    type: "string",
                    description: "Message to log",
                    required: true
                },
                {
                    name: "log_file",
                    type: "string",
                    description: "Path to the log file (default: agent.log)",
                    required: false
                }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let message = validate_required_string!(args, "message");
        let log_file = validate_optional_string!(args, "log_file", "agent.log");

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let entry = format!("[{}] {}\n", timestamp, message);

        if let Some(parent) = Path::new(log_file).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return tool_result!(failure: ToolError::Io(format!(
                        "Failed to create directory: {}",
                        e
                    )));
                }
            }
        }

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .await;

        match file {
            Ok(mut file) => match file.write_all(entry.as_bytes()).await {
                Ok(_) => tool_result!(success: format!("Logged to {}", log_file)),
                Err(e) => {
                    tool_result!(failure: ToolError::Io(format!("Failed to write log: {}", e)))
                }
            },
            Err(e) => tool_result!(failure: ToolError::Io(format!("Failed to open log: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_current_time_format() {
        let tool = CurrentTimeTool::new();
        let result = tool.execute(json!({})).await.unwrap();

        assert!(result.success);
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(result.output.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&result.output, TIMESTAMP_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn test_notification_echoes_message() {
        let tool = NotificationTool::new();
        let result = tool
            .execute(json!({"message": "backup finished"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, "Notification sent: backup finished");
    }

    #[tokio::test]
    async fn test_append_log_accumulates_lines() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("agent.log");
        let log_str = log_path.to_str().unwrap();

        let tool = AppendLogTool::new();
        tool.execute(json!({"message": "first", "log_file": log_str}))
            .await
            .unwrap();
        tool.execute(json!({"message": "second", "log_file": log_str}))
            .await
            .unwrap();

        let contents = fs::read_to_string(&log_path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[tokio::test]
    async fn test_append_log_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs/run.log");

        let tool = AppendLogTool::new();
        let result = tool
            .execute(json!({
                "message": "nested",
                "log_file": log_path.to_str().unwrap()
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(log_path.exists());
    }
}
