//! Vector index trait for storing and searching embedding-keyed entries.

use async_trait::async_trait;

use crate::document::{IndexEntry, Metadata, ScoredChunk};
use crate::error::Result;

/// A searchable store mapping ids to (vector, content, metadata) triples.
///
/// The first successful [`add`](VectorIndex::add) fixes the index's
/// dimensionality; every later vector added to or queried against the index
/// must share it. Implementations own the distance metric and the
/// distance-to-score conversion (`score = 1 / (1 + distance)`), which assumes
/// a non-negative distance such as cosine or Euclidean distance.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{InMemoryIndex, VectorIndex};
///
/// let index = InMemoryIndex::new();
/// index.add(entries).await?;
/// let hits = index.search(&query_vector, 5, None).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add entries to the index, returning the number added.
    ///
    /// Entries are assigned by id; adding an entry whose id already exists
    /// overwrites the existing entry in place. The call is all-or-nothing:
    /// if any vector's dimensionality is wrong, nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`](crate::RagError::DimensionMismatch)
    /// if any vector's length differs from the established dimensionality.
    async fn add(&self, entries: Vec<IndexEntry>) -> Result<usize>;

    /// Search for the `top_k` entries nearest to `query`.
    ///
    /// Results are ordered by ascending distance (descending score); ties
    /// keep insertion order. When `filter` is given, only entries whose
    /// metadata exactly matches every filter key are eligible. An empty
    /// index returns an empty `Vec`, not an error.
    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        filter: Option<&Metadata>,
    ) -> Result<Vec<ScoredChunk>>;

    /// Remove all entries and reset the dimensionality constraint.
    async fn clear(&self) -> Result<()>;

    /// Return the current entry count.
    async fn count(&self) -> Result<usize>;
}
