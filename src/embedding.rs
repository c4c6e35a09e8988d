//! Embedder trait for turning text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// An opaque text-to-vector function.
///
/// Implementations wrap specific embedding backends behind a unified async
/// interface. The default [`embed_batch`](Embedder::embed_batch)
/// implementation filters blank inputs and calls [`embed`](Embedder::embed)
/// sequentially; backends that support native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::Embedder;
///
/// let embedding = embedder.embed("hello world").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`](crate::RagError::EmptyInput) for
    /// empty or whitespace-only text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Blank entries are filtered out before embedding; the returned vectors
    /// correspond, in order, to the non-blank inputs. Override this method
    /// if the backend supports native batch embedding.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                continue;
            }
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this embedder.
    fn dimensions(&self) -> usize;
}
