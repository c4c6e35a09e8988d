//! Query-time retrieval: embed, search, filter, and assemble context.

use std::sync::Arc;

use tracing::{debug, info};

use crate::document::{Metadata, RetrievalResult};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Default separator between context blocks.
pub const DEFAULT_CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Turns a query into ranked, threshold-filtered, context-ready fragments.
///
/// Stateless with respect to the index: repeated calls with identical inputs
/// against an unmodified index are deterministic and reproduce identical
/// ordering.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::Retriever;
///
/// let retriever = Retriever::new(embedder, index, 5, 0.0);
/// let results = retriever.retrieve("what is rust?", None, None).await?;
/// ```
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    score_threshold: f32,
}

impl Retriever {
    /// Create a new retriever.
    ///
    /// `top_k` is the default result count; `score_threshold` is the minimum
    /// score a result must meet (0 disables filtering).
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        score_threshold: f32,
    ) -> Self {
        Self { embedder, index, top_k, score_threshold }
    }

    /// Retrieve the chunks most relevant to `query`.
    ///
    /// A blank query short-circuits to an empty result without touching the
    /// embedder. Results keep the search order; those scoring below the
    /// threshold are dropped.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filter: Option<&Metadata>,
    ) -> Result<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            debug!("blank query, skipping retrieval");
            return Ok(Vec::new());
        }

        let k = top_k.unwrap_or(self.top_k);

        let query_vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(RagError::EmptyInput) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let scored = self.index.search(&query_vector, k, filter).await?;
        let total = scored.len();

        let results: Vec<RetrievalResult> = scored
            .into_iter()
            .filter(|s| s.score >= self.score_threshold)
            .map(RetrievalResult::from)
            .collect();

        info!(
            found = results.len(),
            filtered_out = total - results.len(),
            top_k = k,
            "retrieval completed"
        );

        Ok(results)
    }

    /// Retrieve and join the results into one context string.
    ///
    /// Each result is formatted as `[Source i: <filename>]\n<content>` and
    /// joined by `separator` (defaulting to
    /// [`DEFAULT_CONTEXT_SEPARATOR`]). Returns an empty string when nothing
    /// was retrieved; callers must treat that as "no grounding available",
    /// not as an error.
    pub async fn retrieve_with_context(
        &self,
        query: &str,
        top_k: Option<usize>,
        separator: Option<&str>,
    ) -> Result<String> {
        let results = self.retrieve(query, top_k, None).await?;
        Ok(Self::format_context(&results, separator.unwrap_or(DEFAULT_CONTEXT_SEPARATOR)))
    }

    /// Retrieve and return the unique source names, in first-occurrence
    /// order.
    pub async fn get_sources(&self, query: &str, top_k: Option<usize>) -> Result<Vec<String>> {
        let results = self.retrieve(query, top_k, None).await?;
        Ok(Self::collect_sources(&results))
    }

    /// Format retrieval results into a context string.
    ///
    /// Exposed so callers holding results from one [`retrieve`](Self::retrieve)
    /// call can derive the context without a second retrieval.
    pub fn format_context(results: &[RetrievalResult], separator: &str) -> String {
        let blocks: Vec<String> = results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let filename = result
                    .metadata
                    .get("filename")
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                format!("[Source {}: {}]\n{}", i + 1, filename, result.content)
            })
            .collect();
        blocks.join(separator)
    }

    /// Collect de-duplicated source names from retrieval results.
    ///
    /// Falls back from `source` to `filename` to a literal `"unknown"`.
    pub fn collect_sources(results: &[RetrievalResult]) -> Vec<String> {
        let mut sources = Vec::new();
        for result in results {
            let source = result
                .metadata
                .get("source")
                .or_else(|| result.metadata.get("filename"))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources
    }
}
