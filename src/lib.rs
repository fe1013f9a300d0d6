//! Taskwright - task automation agent with tool calling, web search and
//! bounded RAG conversation memory
//!
//! Wires a chat model, a registry of tools (file I/O, web search, time,
//! notifications, logging) and an optional persistent conversation store
//! into a conversational task runner.

pub mod agent;
pub mod cli;
pub mod config;
pub mod core;
pub mod memory;
pub mod search;
pub mod tools;
pub mod utils;

pub use agent::{TaskAgent, TaskAgentBuilder, TaskReport, TaskStep};
pub use config::Settings;
pub use memory::{ConversationMemory, MessageDraft};
pub use search::SearchProvider;
pub use tools::{Tool, ToolError, ToolResult};
