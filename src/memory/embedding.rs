//! Embedding seam for the conversation memory
//!
//! The default is a deterministic hash-based placeholder: fixed dimension,
//! stable per text, but the rankings it produces carry no semantic meaning.
//! Swap in a real model through the `Embedder` trait.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const DEFAULT_DIMENSIONS: usize = 768;

/// Produces a fixed-dimension vector for a piece of text
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
    fn dimensions(&self) -> usize;
}

/// Hash-based placeholder embedder (NOT semantic)
pub struct PlaceholderEmbedder {
    dimensions: usize,
}

impl PlaceholderEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for PlaceholderEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl Embedder for PlaceholderEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];

        // One hash per dimension, seeded by the dimension index
        for (i, slot) in vector.iter_mut().enumerate() {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);

            let hash = hasher.finish();
            // Normalize to [-1, 1]
            *slot = ((hash as f32) / (u64::MAX as f32)) * 2.0 - 1.0;
        }

        vector
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
