//! Generator trait for producing answers from retrieved context.

use async_trait::async_trait;

use crate::error::Result;
use crate::retriever::DEFAULT_CONTEXT_SEPARATOR;

/// An answer-generation backend.
///
/// Implementations must accept an empty `context` and produce a context-free
/// conversational answer rather than erroring; an empty context means "no
/// grounding available", not a failure.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer to `question` grounded in `context`.
    async fn generate(&self, question: &str, context: &str) -> Result<String>;
}

/// An offline generator that answers by quoting the retrieved context.
///
/// Returns the first context block (stripped of its source tag), truncated to
/// a configurable length. Used as the pipeline's degradation target when the
/// configured generator fails, and usable standalone when no LLM backend is
/// available.
#[derive(Debug, Clone)]
pub struct ExtractiveGenerator {
    max_chars: usize,
}

impl Default for ExtractiveGenerator {
    fn default() -> Self {
        Self { max_chars: 500 }
    }
}

impl ExtractiveGenerator {
    /// Create an extractive generator that quotes at most `max_chars`
    /// characters of context.
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

#[async_trait]
impl Generator for ExtractiveGenerator {
    async fn generate(&self, _question: &str, context: &str) -> Result<String> {
        if context.trim().is_empty() {
            return Ok("I could not find any information on that.".to_string());
        }

        // First context block, minus the "[Source i: ...]" tag line. Split
        // on the full block separator so a horizontal rule inside a document
        // does not truncate the excerpt.
        let first_block =
            context.split(DEFAULT_CONTEXT_SEPARATOR).next().unwrap_or(context).trim();
        let body = match first_block.strip_prefix("[Source") {
            Some(rest) => rest.split_once('\n').map(|(_, body)| body).unwrap_or(""),
            None => first_block,
        };

        let excerpt: String = body.trim().chars().take(self.max_chars).collect();
        Ok(format!("Based on the indexed documents:\n\n{excerpt}"))
    }
}
