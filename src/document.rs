//! Data types for documents, chunks, and retrieval results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// A metadata scalar value.
///
/// Metadata is constrained to string, integer, float, and boolean values so
/// that every entry can be serialized by any index backend without lossy
/// stringification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// A string value.
    Str(String),
    /// A signed integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl MetaValue {
    /// Return the value as a string slice if it is a [`MetaValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => f.write_str(s),
            MetaValue::Int(i) => write!(f, "{i}"),
            MetaValue::Float(x) => write!(f, "{x}"),
            MetaValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<usize> for MetaValue {
    fn from(i: usize) -> Self {
        MetaValue::Int(i as i64)
    }
}

impl From<f64> for MetaValue {
    fn from(x: f64) -> Self {
        MetaValue::Float(x)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

/// An ordered key-value metadata mapping.
pub type Metadata = BTreeMap<String, MetaValue>;

/// A source document containing text content and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text content of the document.
    pub content: String,
    /// Key-value metadata associated with the document.
    pub metadata: Metadata,
}

/// A bounded fragment of a [`Document`], the unit of embedding and retrieval.
///
/// Chunk IDs are generated as `{source}_chunk_{chunk_index}` and are unique
/// within one indexing run. Chunks are immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: Metadata,
}

/// A chunk paired with its embedding, as stored in a vector index.
///
/// Owned exclusively by the index once added; the index is the sole mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique identifier; adding an entry with an existing id overwrites it.
    pub id: String,
    /// The embedding vector for the entry's content.
    pub vector: Vec<f32>,
    /// The text content of the entry.
    pub content: String,
    /// Key-value metadata for the entry.
    pub metadata: Metadata,
}

impl IndexEntry {
    /// Pair chunks with their embeddings, producing index entries.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Arity`] if the number of chunks and embeddings
    /// differ.
    pub fn from_chunks(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Vec<IndexEntry>> {
        if chunks.len() != embeddings.len() {
            return Err(RagError::Arity { chunks: chunks.len(), embeddings: embeddings.len() });
        }

        Ok(chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, vector)| IndexEntry {
                id: chunk.id,
                vector,
                content: chunk.content,
                metadata: chunk.metadata,
            })
            .collect())
    }
}

/// A search hit: an entry's content with its distance to the query vector.
///
/// The score is derived once at search time as `1 / (1 + distance)` and is
/// never recomputed. Distances are non-negative, so scores fall in `(0, 1]`
/// and decrease monotonically with distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The text content of the matched entry.
    pub content: String,
    /// Metadata of the matched entry.
    pub metadata: Metadata,
    /// Distance to the query vector (lower is more similar).
    pub distance: f32,
    /// Similarity score (higher is more relevant).
    pub score: f32,
}

impl ScoredChunk {
    /// Build a scored chunk from a distance, deriving the score.
    pub fn new(content: String, metadata: Metadata, distance: f32) -> Self {
        let score = 1.0 / (1.0 + distance);
        Self { content, metadata, distance, score }
    }
}

/// A retrieval result that survived threshold filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The text content of the retrieved chunk.
    pub content: String,
    /// Similarity score of the retrieved chunk.
    pub score: f32,
    /// Metadata carrying provenance for the retrieved chunk.
    pub metadata: Metadata,
}

impl From<ScoredChunk> for RetrievalResult {
    fn from(scored: ScoredChunk) -> Self {
        Self { content: scored.content, score: scored.score, metadata: scored.metadata }
    }
}

/// The assembled answer to one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// The generated answer text.
    pub answer: String,
    /// Unique source names in first-occurrence order.
    pub sources: Vec<String>,
    /// The retrieval results the answer was grounded on.
    pub retrieved_chunks: Vec<RetrievalResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_derived_from_distance() {
        let scored = ScoredChunk::new("text".to_string(), Metadata::new(), 0.0);
        assert_eq!(scored.score, 1.0);

        let further = ScoredChunk::new("text".to_string(), Metadata::new(), 1.0);
        assert_eq!(further.score, 0.5);
        assert!(further.score < scored.score);
    }

    #[test]
    fn from_chunks_rejects_arity_mismatch() {
        let chunks = vec![Chunk {
            id: "a_chunk_0".to_string(),
            content: "a".to_string(),
            metadata: Metadata::new(),
        }];
        let err = IndexEntry::from_chunks(chunks, vec![]).unwrap_err();
        assert!(matches!(err, RagError::Arity { chunks: 1, embeddings: 0 }));
    }

    #[test]
    fn meta_value_serializes_untagged() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), "notes.txt".into());
        metadata.insert("chunk_index".to_string(), 3usize.into());

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"chunk_index":3,"source":"notes.txt"}"#);
    }
}
