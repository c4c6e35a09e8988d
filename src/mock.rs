//! Deterministic mock collaborators for tests and offline use.
//!
//! [`MockEmbedder`] produces stable character-histogram vectors so that
//! similar texts land near each other without a model. [`StaticGenerator`]
//! returns a canned answer. Both are substitutable for the live backends in
//! any pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generator::Generator;

/// A deterministic [`Embedder`] that hashes characters into a fixed-size
/// histogram.
///
/// Texts sharing many characters produce nearby vectors, which is enough for
/// exercising index ordering and threshold filtering in tests. Tracks how
/// many embed calls were made so tests can assert the embedder was (not)
/// invoked.
#[derive(Debug)]
pub struct MockEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, calls: AtomicUsize::new(0) }
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(RagError::EmptyInput);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut vector = vec![0.0f32; self.dimensions];
        for ch in text.chars() {
            vector[(ch as usize) % self.dimensions] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`Generator`] that always returns the same answer.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    answer: String,
}

impl StaticGenerator {
    /// Create a generator returning `answer` for every question.
    pub fn new(answer: impl Into<String>) -> Self {
        Self { answer: answer.into() }
    }
}

#[async_trait]
impl Generator for StaticGenerator {
    async fn generate(&self, _question: &str, _context: &str) -> Result<String> {
        Ok(self.answer.clone())
    }
}

/// A [`Generator`] that always fails, for exercising degradation paths.
#[derive(Debug, Clone, Default)]
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _question: &str, _context: &str) -> Result<String> {
        Err(RagError::Generation {
            provider: "failing".to_string(),
            message: "backend unavailable".to_string(),
        })
    }
}
