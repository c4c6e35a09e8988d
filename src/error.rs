//! Error types for the `ragkit` crate.

use thiserror::Error;

/// Errors that can occur in retrieval and indexing operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error. Fatal at construction time.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A vector's dimensionality does not match the index's established
    /// dimensionality.
    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality fixed by the first successful add.
        expected: usize,
        /// Dimensionality of the rejected vector.
        actual: usize,
    },

    /// The number of chunks and embeddings in an indexing batch do not match.
    #[error("Arity mismatch: {chunks} chunks but {embeddings} embeddings")]
    Arity {
        /// Number of chunks in the batch.
        chunks: usize,
        /// Number of embeddings in the batch.
        embeddings: usize,
    },

    /// Blank text was passed where non-empty input is required.
    #[error("Empty input: text must not be blank")]
    EmptyInput,

    /// An error in the index's backing storage.
    #[error("Storage error ({backend}): {message}")]
    Storage {
        /// The storage backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error from the answer-generation backend.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
