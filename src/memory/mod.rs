//! Bounded RAG Conversation Memory
//!
//! Holds up to `max_size` most-recent conversation turns, supports
//! similarity-based retrieval, and persists across restarts as a single
//! JSON document (`{"messages": [...]}`) rewritten wholesale on every
//! mutation. Eviction is truncate-and-rebuild, oldest first.
//!
//! Information Hiding:
//! - Embedding generation hidden behind the `Embedder` trait
//! - Index layout and persistence format hidden from callers

pub mod embedding;
pub mod store;

use anyhow::{Context, Result};
use chrono::Local;
use embedding::{Embedder, PlaceholderEmbedder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store::VectorIndex;
use tokio::fs;

/// A single persisted conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// An unstamped turn handed to `add_messages`
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub role: String,
    pub content: String,
}

impl MessageDraft {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryFile {
    messages: Vec<MemoryRecord>,
}

/// Bounded conversation store backed by a similarity index and a JSON file
///
/// Single-writer, single-process. A persistence failure after an in-memory
/// mutation is reported but not rolled back; the next successful write
/// reconverges the file with the index.
pub struct ConversationMemory {
    path: PathBuf,
    max_size: usize,
    embedder: Box<dyn Embedder>,
    index: VectorIndex,
}

impl ConversationMemory {
    /// Open a store with the placeholder embedder
    pub async fn open(path: impl AsRef<Path>, max_size: usize) -> Result<Self> {
        Self::open_with_embedder(path, max_size, Box::new(PlaceholderEmbedder::default())).await
    }

    /// Open a store with a caller-supplied embedder
    pub async fn open_with_embedder(
        path: impl AsRef<Path>,
        max_size: usize,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self> {
        let mut memory = Self {
            path: path.as_ref().to_path_buf(),
            max_size,
            embedder,
            index: VectorIndex::new(),
        };
        memory.load().await?;
        Ok(memory)
    }

    /// Read the JSON file (if present), re-embed every record, re-apply the bound
    async fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let json = fs::read_to_string(&self.path)
            .await
            .context(format!("Failed to read memory file: {:?}", self.path))?;

        let file: MemoryFile =
            serde_json::from_str(&json).context("Failed to deserialize memory file")?;

        for record in file.messages {
            let embedding = self.embedder.embed(&record.content);
            self.index.insert(record, embedding);
        }
        self.enforce_size_limit();

        tracing::debug!(
            "[ConversationMemory] Loaded {} messages from {:?}",
            self.index.len(),
            self.path
        );
        Ok(())
    }

    /// Add a batch of turns, all stamped with one timestamp, then evict and persist
    pub async fn add_messages(&mut self, drafts: &[MessageDraft]) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

        for draft in drafts {
            let record = MemoryRecord {
                role: draft.role.clone(),
                content: draft.content.clone(),
                timestamp: timestamp.clone(),
            };
            let embedding = self.embedder.embed(&record.content);
            self.index.insert(record, embedding);
        }

        self.enforce_size_limit();
        self.persist().await
    }

    /// Top-k retrieval formatted as a labeled transcript
    ///
    /// Empty string when the store is empty. Ranking quality is whatever the
    /// configured embedder provides; the placeholder is not semantic.
    pub fn retrieve(&self, query: &str, k: usize) -> String {
        if self.index.is_empty() {
            return String::new();
        }

        let hits = self.index.search(&self.embedder.embed(query), k);
        if hits.is_empty() {
            return String::new();
        }

        let mut lines = vec!["Relevant conversation:".to_string()];
        for record in hits {
            lines.push(format!("{}: {}", record.role, record.content));
        }
        lines.join("\n")
    }

    /// Discard everything and persist the empty set
    pub async fn clear(&mut self) -> Result<()> {
        self.index.clear();
        self.persist().await
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Snapshot of the current records, oldest first
    pub fn records(&self) -> Vec<MemoryRecord> {
        self.index.records().cloned().collect()
    }

    /// Keep only the most recent `max_size` records (truncate-and-rebuild)
    fn enforce_size_limit(&mut self) {
        if self.index.len() <= self.max_size {
            return;
        }

        let skip = self.index.len() - self.max_size;
        let tail: Vec<MemoryRecord> = self.index.records().skip(skip).cloned().collect();

        self.index.clear();
        for record in tail {
            let embedding = self.embedder.embed(&record.content);
            self.index.insert(record, embedding);
        }
    }

    /// Rewrite the whole JSON file from the index
    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create memory directory")?;
            }
        }

        let file = MemoryFile {
            messages: self.records(),
        };
        let json =
            serde_json::to_string_pretty(&file).context("Failed to serialize memory file")?;

        fs::write(&self.path, json)
            .await
            .context(format!("Failed to write memory file: {:?}", self.path))?;

        tracing::debug!(
            "[ConversationMemory] Saved {} messages to {:?}",
            file.messages.len(),
            self.path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_add_messages_stamps_shared_timestamp() {
        let dir = tempdir().unwrap();
        let mut memory = ConversationMemory::open(dir.path().join("mem.json"), 10)
            .await
            .unwrap();

        memory
            .add_messages(&[
                MessageDraft::user("What is Rust?"),
                MessageDraft::assistant("A systems programming language"),
            ])
            .await
            .unwrap();

        let records = memory.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, "user");
        assert_eq!(records[1].role, "assistant");
        assert_eq!(records[0].timestamp, records[1].timestamp);
        assert!(!records[0].timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_eviction_keeps_most_recent_tail() {
        let dir = tempdir().unwrap();
        let mut memory = ConversationMemory::open(dir.path().join("mem.json"), 3)
            .await
            .unwrap();

        for i in 0..10 {
            memory
                .add_messages(&[MessageDraft::user(format!("Message {}", i))])
                .await
                .unwrap();
        }

        let records = memory.records();
        assert_eq!(records.len(), 3);
        let contents: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["Message 7", "Message 8", "Message 9"]);
    }

    #[tokio::test]
    async fn test_persist_and_restore_same_bounded_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mem.json");

        let before = {
            let mut memory = ConversationMemory::open(&path, 5).await.unwrap();
            for i in 0..8 {
                memory
                    .add_messages(&[MessageDraft::user(format!("Turn {}", i))])
                    .await
                    .unwrap();
            }
            memory.records()
        };

        let memory = ConversationMemory::open(&path, 5).await.unwrap();
        assert_eq!(memory.records(), before);
        assert_eq!(memory.len(), 5);
    }

    #[tokio::test]
    async fn test_restore_reapplies_smaller_bound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mem.json");

        {
            let mut memory = ConversationMemory::open(&path, 10).await.unwrap();
            for i in 0..6 {
                memory
                    .add_messages(&[MessageDraft::user(format!("Turn {}", i))])
                    .await
                    .unwrap();
            }
        }

        let memory = ConversationMemory::open(&path, 2).await.unwrap();
        let contents: Vec<String> = memory.records().iter().map(|r| r.content.clone()).collect();
        assert_eq!(contents, vec!["Turn 4", "Turn 5"]);
    }

    #[tokio::test]
    async fn test_retrieve_on_empty_store_is_empty() {
        let dir = tempdir().unwrap();
        let memory = ConversationMemory::open(dir.path().join("mem.json"), 5)
            .await
            .unwrap();

        assert_eq!(memory.retrieve("anything at all", 3), "");
    }

    #[tokio::test]
    async fn test_retrieve_formats_labeled_transcript() {
        let dir = tempdir().unwrap();
        let mut memory = ConversationMemory::open(dir.path().join("mem.json"), 10)
            .await
            .unwrap();

        memory
            .add_messages(&[
                MessageDraft::user("I like Python"),
                MessageDraft::assistant("Python is great!"),
            ])
            .await
            .unwrap();

        let context = memory.retrieve("programming languages", 2);
        assert!(context.starts_with("Relevant conversation:"));
        assert_eq!(context.lines().count(), 3);
        assert!(context.contains("user: I like Python"));
        assert!(context.contains("assistant: Python is great!"));
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_k() {
        let dir = tempdir().unwrap();
        let mut memory = ConversationMemory::open(dir.path().join("mem.json"), 10)
            .await
            .unwrap();

        for i in 0..6 {
            memory
                .add_messages(&[MessageDraft::user(format!("Entry {}", i))])
                .await
                .unwrap();
        }

        let context = memory.retrieve("entries", 2);
        // Header plus two hits
        assert_eq!(context.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mem.json");

        let mut memory = ConversationMemory::open(&path, 5).await.unwrap();
        memory
            .add_messages(&[MessageDraft::user("transient")])
            .await
            .unwrap();
        memory.clear().await.unwrap();

        assert!(memory.is_empty());

        let reopened = ConversationMemory::open(&path, 5).await.unwrap();
        assert!(reopened.is_empty());
    }

    #[tokio::test]
    async fn test_file_matches_index_after_every_mutation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mem.json");

        let mut memory = ConversationMemory::open(&path, 3).await.unwrap();
        for i in 0..5 {
            memory
                .add_messages(&[MessageDraft::user(format!("Step {}", i))])
                .await
                .unwrap();

            let json = std::fs::read_to_string(&path).unwrap();
            let file: MemoryFile = serde_json::from_str(&json).unwrap();
            assert_eq!(file.messages, memory.records());
        }
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let memory = ConversationMemory::open(dir.path().join("never_written.json"), 5)
            .await
            .unwrap();
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mem.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = ConversationMemory::open(&path, 5).await;
        assert!(result.is_err());
    }
}
