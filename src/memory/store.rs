//! In-memory similarity index
//!
//! Insertion-ordered record store with cosine-similarity ranked lookup.
//! No approximate indexing - a linear scan is plenty at conversation scale.

use super::MemoryRecord;

/// Similarity index over (record, embedding) pairs
pub struct VectorIndex {
    entries: Vec<(MemoryRecord, Vec<f32>)>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, record: MemoryRecord, embedding: Vec<f32>) {
        self.entries.push((record, embedding));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.entries.iter().map(|(record, _)| record)
    }

    /// The `k` records most similar to the query embedding
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&MemoryRecord> {
        let mut scored: Vec<(f32, &MemoryRecord)> = self
            .entries
            .iter()
            .map(|(record, embedding)| (cosine_similarity(query, embedding), record))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(_, record)| record).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
