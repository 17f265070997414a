//! In-process vector index engine with named transient collections.
//!
//! The engine is the one piece of state shared across concurrent requests:
//! an `RwLock`-guarded table of named collections. Each request creates a
//! uniquely named collection, populates it, queries it, and destroys it;
//! distinct names never interfere.
//!
//! Queries are brute-force cosine distance (`1 − cosine similarity`) over
//! all stored vectors, sorted ascending and truncated to `k`. Collections
//! hold at most one page's chunks, so linear scan is the right tool.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::PipelineError;
use crate::models::ChunkMetadata;

/// One stored chunk: positional id, embedding, text, and display metadata.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// One nearest-neighbor hit.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

/// Table of named transient collections.
#[derive(Default)]
pub struct IndexEngine {
    collections: RwLock<HashMap<String, Vec<IndexEntry>>>,
}

impl IndexEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection. Fails if the name is already taken.
    pub fn create_collection(&self, name: &str) -> Result<(), PipelineError> {
        let mut collections = self.collections.write().unwrap();
        if collections.contains_key(name) {
            return Err(PipelineError::Index(format!(
                "collection already exists: {name}"
            )));
        }
        collections.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Append entries to an existing collection.
    pub fn add(&self, name: &str, entries: Vec<IndexEntry>) -> Result<(), PipelineError> {
        let mut collections = self.collections.write().unwrap();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| PipelineError::Index(format!("no such collection: {name}")))?;
        collection.extend(entries);
        Ok(())
    }

    /// Return the `k` nearest entries to `query_vec`, ascending by distance.
    pub fn query(
        &self,
        name: &str,
        query_vec: &[f32],
        k: usize,
    ) -> Result<Vec<Neighbor>, PipelineError> {
        let collections = self.collections.read().unwrap();
        let collection = collections
            .get(name)
            .ok_or_else(|| PipelineError::Index(format!("no such collection: {name}")))?;

        let mut neighbors: Vec<Neighbor> = collection
            .iter()
            .map(|entry| Neighbor {
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
                distance: 1.0 - cosine_similarity(query_vec, &entry.vector),
            })
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Destroy a collection. Fails if it does not exist.
    pub fn delete_collection(&self, name: &str) -> Result<(), PipelineError> {
        let mut collections = self.collections.write().unwrap();
        collections
            .remove(name)
            .ok_or_else(|| PipelineError::Index(format!("no such collection: {name}")))?;
        Ok(())
    }

    /// Whether a collection with this name currently exists.
    pub fn contains(&self, name: &str) -> bool {
        self.collections.read().unwrap().contains_key(name)
    }

    /// Number of live collections.
    pub fn collection_count(&self) -> usize {
        self.collections.read().unwrap().len()
    }
}

/// Cosine similarity in `[-1, 1]`; mismatched or zero-magnitude vectors
/// score `0.0` (orthogonal) rather than erroring.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
