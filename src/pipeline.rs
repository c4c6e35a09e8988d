//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] wires the [`TextChunker`], an [`Embedder`], a
//! [`VectorIndex`], and a [`Generator`] into an end-to-end
//! index-then-answer workflow. Construct one via
//! [`RagPipeline::builder()`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{InMemoryIndex, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! pipeline.index_documents("./docs", false).await?;
//! let response = pipeline.query("How does ownership work?", None, true).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::chunker::TextChunker;
use crate::config::RagConfig;
use crate::document::{Document, IndexEntry, RagResponse};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generator::{ExtractiveGenerator, Generator};
use crate::index::VectorIndex;
use crate::loader::DocumentLoader;
use crate::retriever::{DEFAULT_CONTEXT_SEPARATOR, Retriever};

/// The fixed answer returned when retrieval finds nothing.
pub const NO_INFORMATION_ANSWER: &str = "I could not find any information on that.";

/// End-to-end retrieval-augmented generation pipeline.
///
/// Indexing runs accumulate in the index unless the caller requests a
/// clear-first; `clear` empties it again. The pipeline is an explicit handle:
/// all state lives in the injected index, none in process-wide globals.
pub struct RagPipeline {
    config: RagConfig,
    loader: DocumentLoader,
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    retriever: Retriever,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A point-in-time summary of pipeline state.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Number of entries currently in the index.
    pub indexed_chunks: usize,
    /// The pipeline's configuration.
    pub config: RagConfig,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the retriever.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Index documents from `source`: load, chunk, embed, add.
    ///
    /// `source` is resolved as a file path, a directory path (recursive), or
    /// failing both, literal text. Returns the number of chunks added; zero
    /// documents or zero chunks return `Ok(0)` without error.
    ///
    /// # Errors
    ///
    /// Embedding and storage failures propagate. Earlier steps of the same
    /// call are not rolled back, so a failed call may leave a partial index;
    /// it is safe to retry after [`clear`](Self::clear).
    pub async fn index_documents(&self, source: &str, clear_existing: bool) -> Result<usize> {
        if clear_existing {
            info!("clearing existing index before indexing");
            self.index.clear().await?;
        }

        let path = Path::new(source);
        let documents: Vec<Document> = if path.is_file() {
            self.loader.load_file(path).into_iter().collect()
        } else if path.is_dir() {
            self.loader.load_directory(path, true)
        } else {
            vec![self.loader.load_text(source, "direct_input")]
        };

        if documents.is_empty() {
            warn!(source, "no documents to index");
            return Ok(0);
        }

        let chunks = self.chunker.split_documents(&documents);
        if chunks.is_empty() {
            warn!(source, "documents produced no chunks");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(source, error = %e, "embedding failed during indexing");
            e
        })?;

        let entries = IndexEntry::from_chunks(chunks, embeddings)?;
        let added = self.index.add(entries).await.map_err(|e| {
            error!(source, error = %e, "index add failed during indexing");
            e
        })?;

        info!(source, chunks = added, "indexing completed");
        Ok(added)
    }

    /// Index a single literal text under the given source name.
    pub async fn add_document(&self, text: &str, source_name: &str) -> Result<usize> {
        let document = self.loader.load_text(text, source_name);
        let chunks = self.chunker.split_documents(&[document]);
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let entries = IndexEntry::from_chunks(chunks, embeddings)?;
        self.index.add(entries).await
    }

    /// Answer a question with retrieval-augmented generation.
    ///
    /// Retrieves once and derives the context, the sources, and the returned
    /// chunks from that single result set. With no retrieval results, the
    /// generator is not invoked and the answer is [`NO_INFORMATION_ANSWER`].
    /// A generator failure degrades to an extractive answer built from the
    /// retrieved context instead of propagating, so retrieval work is never
    /// wasted.
    pub async fn query(
        &self,
        question: &str,
        top_k: Option<usize>,
        return_sources: bool,
    ) -> Result<RagResponse> {
        let retrieved = self.retriever.retrieve(question, top_k, None).await?;

        if retrieved.is_empty() {
            info!(question, "no relevant chunks retrieved");
            return Ok(RagResponse {
                answer: NO_INFORMATION_ANSWER.to_string(),
                sources: Vec::new(),
                retrieved_chunks: Vec::new(),
            });
        }

        let context = Retriever::format_context(&retrieved, DEFAULT_CONTEXT_SEPARATOR);

        let answer = match self.generator.generate(question, &context).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "generator failed, falling back to extractive answer");
                ExtractiveGenerator::default().generate(question, &context).await?
            }
        };

        let sources = if return_sources {
            Retriever::collect_sources(&retrieved)
        } else {
            Vec::new()
        };

        info!(question, chunks = retrieved.len(), sources = sources.len(), "query completed");
        Ok(RagResponse { answer, sources, retrieved_chunks: retrieved })
    }

    /// Remove all indexed entries, returning the pipeline to its empty state.
    pub async fn clear(&self) -> Result<()> {
        self.index.clear().await
    }

    /// Number of entries currently in the index.
    pub async fn count(&self) -> Result<usize> {
        self.index.count().await
    }

    /// Return a summary of the pipeline's current state.
    pub async fn stats(&self) -> Result<PipelineStats> {
        Ok(PipelineStats { indexed_chunks: self.index.count().await?, config: self.config.clone() })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedder, index, and generator are required; the config defaults to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    loader: Option<DocumentLoader>,
    embedder: Option<Arc<dyn Embedder>>,
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn Generator>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document loader.
    pub fn loader(mut self, loader: DocumentLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the embedding backend.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the answer-generation backend.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`RagPipeline`], validating configuration and wiring.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required collaborator is missing or
    /// the configuration is inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::Config("generator is required".to_string()))?;

        let chunker = TextChunker::from_config(&config)?;
        let retriever =
            Retriever::new(embedder.clone(), index.clone(), config.top_k, config.score_threshold);

        Ok(RagPipeline {
            config,
            loader: self.loader.unwrap_or_default(),
            chunker,
            embedder,
            index,
            generator,
            retriever,
        })
    }
}
