//! In-memory vector index using cosine distance.
//!
//! [`InMemoryIndex`] is a zero-dependency [`VectorIndex`] backed by a
//! `tokio::sync::RwLock`. It is suitable for development, testing, and
//! small corpora.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexEntry, Metadata, ScoredChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// An in-memory [`VectorIndex`] using cosine distance.
///
/// Entries are kept in insertion order so that equal-distance search results
/// tie-break deterministically. Adding an entry with an existing id replaces
/// that entry in place without disturbing the order.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    inner: RwLock<IndexInner>,
}

#[derive(Debug, Default)]
struct IndexInner {
    /// Entries in insertion order.
    entries: Vec<IndexEntry>,
    /// id → slot in `entries`.
    by_id: HashMap<String, usize>,
    /// Fixed by the first successful add; reset by `clear`.
    dimensions: Option<usize>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine distance between two vectors: `1 - cos_sim`, in `[0, 2]`.
///
/// A zero-magnitude vector has no direction; its distance is defined as 1
/// (the same as an orthogonal vector).
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (norm_a * norm_b)).max(0.0)
}

/// True when every key-value pair in `filter` is present in `metadata`.
fn matches_filter(metadata: &Metadata, filter: &Metadata) -> bool {
    filter.iter().all(|(key, value)| metadata.get(key) == Some(value))
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn add(&self, entries: Vec<IndexEntry>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut inner = self.inner.write().await;

        // Validate every vector before touching state: the batch is
        // all-or-nothing.
        let expected = inner.dimensions.unwrap_or(entries[0].vector.len());
        for entry in &entries {
            if entry.vector.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: entry.vector.len(),
                });
            }
        }
        inner.dimensions = Some(expected);

        let count = entries.len();
        for entry in entries {
            let existing = inner.by_id.get(&entry.id).copied();
            match existing {
                Some(slot) => inner.entries[slot] = entry,
                None => {
                    let slot = inner.entries.len();
                    inner.by_id.insert(entry.id.clone(), slot);
                    inner.entries.push(entry);
                }
            }
        }

        Ok(count)
    }

    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        filter: Option<&Metadata>,
    ) -> Result<Vec<ScoredChunk>> {
        let inner = self.inner.read().await;

        let Some(expected) = inner.dimensions else {
            return Ok(Vec::new());
        };
        if query.len() != expected {
            return Err(RagError::DimensionMismatch { expected, actual: query.len() });
        }

        let mut scored: Vec<ScoredChunk> = inner
            .entries
            .iter()
            .filter(|entry| filter.is_none_or(|f| matches_filter(&entry.metadata, f)))
            .map(|entry| {
                let distance = cosine_distance(&entry.vector, query);
                ScoredChunk::new(entry.content.clone(), entry.metadata.clone(), distance)
            })
            .collect();

        // Stable sort keeps insertion order for equal distances.
        scored.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.by_id.clear();
        inner.dimensions = None;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, vector: Vec<f32>, content: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            vector,
            content: content.to_string(),
            metadata: Metadata::new(),
        }
    }

    fn entry_with_meta(id: &str, vector: Vec<f32>, key: &str, value: &str) -> IndexEntry {
        let mut e = entry(id, vector, id);
        e.metadata.insert(key.to_string(), value.into());
        e
    }

    #[tokio::test]
    async fn empty_index_returns_no_results() {
        let index = InMemoryIndex::new();
        let results = index.search(&[1.0, 0.0], 10, None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn results_ordered_by_ascending_distance() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry("far", vec![0.0, 1.0], "orthogonal"),
                entry("near", vec![1.0, 0.0], "aligned"),
                entry("mid", vec![1.0, 1.0], "diagonal"),
            ])
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0], 3, None).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "aligned");
        assert_eq!(results[1].content, "diagonal");
        assert_eq!(results[2].content, "orthogonal");
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
    }

    #[tokio::test]
    async fn equal_distances_keep_insertion_order() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry("first", vec![0.0, 1.0], "first"),
                entry("second", vec![0.0, 1.0], "second"),
                entry("third", vec![0.0, 1.0], "third"),
            ])
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0], 3, None).await.unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn top_k_bounds_result_count() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry("a", vec![1.0, 0.0], "a"),
                entry("b", vec![0.0, 1.0], "b"),
                entry("c", vec![1.0, 1.0], "c"),
            ])
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0], 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn reindexing_same_id_overwrites_without_growing() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("doc_chunk_0", vec![1.0, 0.0], "old content")]).await.unwrap();
        index.add(vec![entry("doc_chunk_0", vec![1.0, 0.0], "new content")]).await.unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let results = index.search(&[1.0, 0.0], 1, None).await.unwrap();
        assert_eq!(results[0].content, "new content");
    }

    #[tokio::test]
    async fn mismatched_dimensions_reject_whole_batch() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0, 0.0], "a")]).await.unwrap();

        let err = index
            .add(vec![
                entry("b", vec![0.0, 1.0], "b"),
                entry("c", vec![0.0, 1.0, 0.0], "c"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));

        // Nothing from the rejected batch was stored.
        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn query_dimension_is_checked() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0, 0.0], "a")]).await.unwrap();

        let err = index.search(&[1.0, 0.0, 0.0], 1, None).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[tokio::test]
    async fn clear_resets_dimensionality() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0, 0.0], "a")]).await.unwrap();
        index.clear().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);

        // A different dimensionality is accepted after clear.
        index.add(vec![entry("b", vec![1.0, 0.0, 0.0], "b")]).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn metadata_filter_is_exact_match_on_all_keys() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry_with_meta("a", vec![1.0, 0.0], "source", "a.txt"),
                entry_with_meta("b", vec![1.0, 0.1], "source", "b.txt"),
            ])
            .await
            .unwrap();

        let mut filter = Metadata::new();
        filter.insert("source".to_string(), "b.txt".into());
        let results = index.search(&[1.0, 0.0], 10, Some(&filter)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "b");

        filter.insert("missing".to_string(), "x".into());
        let results = index.search(&[1.0, 0.0], 10, Some(&filter)).await.unwrap();
        assert!(results.is_empty());
    }
}
