//! # ragkit
//!
//! A Retrieval-Augmented Generation engine: deterministic text chunking with
//! overlap, a vector index abstraction with similarity scoring, and a
//! retriever that turns a query into ranked, filtered, context-ready
//! fragments for answer generation.
//!
//! ## Overview
//!
//! Indexing flows `text → TextChunker → Embedder → VectorIndex`; querying
//! flows `query → Embedder → VectorIndex::search → Retriever → Generator`.
//! The embedding model, the index backend, and the answer model are
//! capability traits ([`Embedder`], [`VectorIndex`], [`Generator`]) injected
//! at construction, so any of them can be swapped for a local, remote, or
//! mock implementation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{InMemoryIndex, RagConfig, RagPipeline};
//! use ragkit::mock::{MockEmbedder, StaticGenerator};
//!
//! # async fn run() -> ragkit::Result<()> {
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::builder().chunk_size(500).chunk_overlap(50).build()?)
//!     .embedder(Arc::new(MockEmbedder::new(384)))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .generator(Arc::new(StaticGenerator::new("...")))
//!     .build()?;
//!
//! pipeline.index_documents("./docs", false).await?;
//! let response = pipeline.query("How does chunk overlap work?", None, true).await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - [`InMemoryIndex`] — cosine-distance index for development and testing
//! - `OpenAIEmbedder` — OpenAI embeddings API (feature `openai`)
//! - `OllamaGenerator` — local Ollama answering (feature `ollama`)
//! - [`mock`] — deterministic collaborators for tests without live services
//!
//! ## Scoring
//!
//! Search results carry `score = 1 / (1 + distance)`. The bundled index uses
//! cosine distance, which is non-negative, so scores fall in `(0, 1]` and
//! decrease monotonically with distance. Backends built on a different
//! metric (e.g. inner product) must revisit this conversion.

pub mod chunker;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generator;
pub mod index;
pub mod loader;
pub mod memory;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod retriever;

pub use chunker::TextChunker;
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{
    Chunk, Document, IndexEntry, MetaValue, Metadata, RagResponse, RetrievalResult, ScoredChunk,
};
pub use embedding::Embedder;
pub use error::{RagError, Result};
pub use generator::{ExtractiveGenerator, Generator};
pub use index::VectorIndex;
pub use loader::DocumentLoader;
pub use memory::InMemoryIndex;
#[cfg(feature = "ollama")]
pub use ollama::OllamaGenerator;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbedder;
pub use pipeline::{NO_INFORMATION_ANSWER, PipelineStats, RagPipeline, RagPipelineBuilder};
pub use retriever::{DEFAULT_CONTEXT_SEPARATOR, Retriever};
