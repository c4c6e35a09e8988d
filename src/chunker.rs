//! Deterministic text segmentation with overlap.
//!
//! [`TextChunker`] splits raw text into size-bounded chunks, preferring to cut
//! at a configurable separator and carrying a fixed-length character tail
//! between consecutive chunks so a reader can locate shared context.

use tracing::debug;

use crate::config::RagConfig;
use crate::document::{Chunk, Document, Metadata};
use crate::error::{RagError, Result};

/// Splits text into overlapping, size-bounded chunks.
///
/// Chunking is a pure function of the input text and the configuration: the
/// same input always produces the same chunk sequence and ids. All sizes are
/// counted in characters, not bytes.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::TextChunker;
///
/// let chunker = TextChunker::new(500, 50, "\n\n")?;
/// let chunks = chunker.split(&text, &metadata);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl TextChunker {
    /// Create a new `TextChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize, separator: impl Into<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap, separator: separator.into() })
    }

    /// Create a `TextChunker` from a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, config.separator.clone())
    }

    /// Split text into chunks, attaching the caller's metadata to each.
    ///
    /// Returns an empty `Vec` for empty or whitespace-only input. Each chunk's
    /// metadata is the caller's metadata plus `chunk_index` and `chunk_size`
    /// (content length in characters); its id is derived from the `source`
    /// metadata field, falling back to `"unknown"`.
    pub fn split(&self, text: &str, metadata: &Metadata) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut buffer = String::new();

        for segment in text.split(self.separator.as_str()) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let segment_len = char_len(segment);

            // A segment that alone exceeds the bound bypasses accumulation:
            // flush the pending buffer, then window the segment.
            if segment_len > self.chunk_size {
                if !buffer.is_empty() {
                    let index = chunks.len();
                    chunks.push(self.make_chunk(&buffer, metadata, index));
                    buffer.clear();
                }
                for window in self.split_by_characters(segment) {
                    let index = chunks.len();
                    chunks.push(self.make_chunk(&window, metadata, index));
                }
                continue;
            }

            if buffer.is_empty() {
                buffer.push_str(segment);
                continue;
            }

            let candidate_len = char_len(&buffer) + char_len(&self.separator) + segment_len;
            if candidate_len <= self.chunk_size {
                buffer.push_str(&self.separator);
                buffer.push_str(segment);
            } else {
                let index = chunks.len();
                chunks.push(self.make_chunk(&buffer, metadata, index));

                // Seed the next buffer with the flushed chunk's tail.
                let tail = overlap_tail(&buffer, self.chunk_overlap);
                buffer.clear();
                buffer.push_str(&tail);
                buffer.push_str(segment);

                // The seeded buffer can exceed the bound when the segment is
                // near chunk_size; window it so the size bound holds.
                if char_len(&buffer) > self.chunk_size {
                    for window in self.split_by_characters(&buffer) {
                        let index = chunks.len();
                        chunks.push(self.make_chunk(&window, metadata, index));
                    }
                    buffer.clear();
                }
            }
        }

        if !buffer.trim().is_empty() {
            let index = chunks.len();
            chunks.push(self.make_chunk(&buffer, metadata, index));
        }

        chunks
    }

    /// Split multiple documents, concatenating chunks in document order.
    ///
    /// Each document's metadata gains a `doc_index` field before chunking.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();

        for (doc_index, document) in documents.iter().enumerate() {
            let mut metadata = document.metadata.clone();
            metadata.insert("doc_index".to_string(), doc_index.into());
            all_chunks.extend(self.split(&document.content, &metadata));
        }

        debug!(documents = documents.len(), chunks = all_chunks.len(), "chunked documents");
        all_chunks
    }

    /// Character-window pass for text longer than `chunk_size`.
    ///
    /// Windows are at most `chunk_size` wide, cutting at the last whitespace
    /// before the window end when possible to avoid splitting mid-word. The
    /// next window resumes `chunk_overlap` characters before the cut, never
    /// before the cut's own window start. The final partial window is emitted
    /// even when shorter than `chunk_size`.
    fn split_by_characters(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut windows = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            if end == chars.len() {
                push_window(&mut windows, &chars[start..end]);
                break;
            }

            let cut = chars[start..end]
                .iter()
                .rposition(|c| c.is_whitespace())
                .map(|p| start + p)
                .filter(|&p| p > start)
                .unwrap_or(end);
            push_window(&mut windows, &chars[start..cut]);

            // A cut within the first chunk_overlap characters would regress;
            // resume at the cut itself so no characters are skipped. The cut
            // is always past `start`, so the loop still advances.
            let mut next = cut.saturating_sub(self.chunk_overlap);
            if next <= start {
                next = cut;
            }
            start = next;
        }

        windows
    }

    fn make_chunk(&self, content: &str, base: &Metadata, index: usize) -> Chunk {
        let mut metadata = base.clone();
        metadata.insert("chunk_index".to_string(), index.into());
        metadata.insert("chunk_size".to_string(), char_len(content).into());

        let source = base
            .get("source")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Chunk { id: format!("{source}_chunk_{index}"), content: content.to_string(), metadata }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Push a window unless it is whitespace-only.
fn push_window(windows: &mut Vec<String>, chars: &[char]) {
    if chars.iter().any(|c| !c.is_whitespace()) {
        windows.push(chars.iter().collect());
    }
}

/// The last `n` characters of `s`, or all of `s` if it is shorter.
fn overlap_tail(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(source: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), source.into());
        metadata
    }

    #[test]
    fn empty_and_whitespace_input_yield_no_chunks() {
        let chunker = TextChunker::new(100, 10, "\n\n").unwrap();
        assert!(chunker.split("", &Metadata::new()).is_empty());
        assert!(chunker.split("   \n\n  \t ", &Metadata::new()).is_empty());
    }

    #[test]
    fn overlap_must_be_less_than_chunk_size() {
        assert!(matches!(TextChunker::new(10, 10, "\n\n").unwrap_err(), RagError::Config(_)));
        assert!(matches!(TextChunker::new(0, 0, "\n\n").unwrap_err(), RagError::Config(_)));
    }

    #[test]
    fn segments_accumulate_up_to_chunk_size() {
        let chunker = TextChunker::new(30, 0, "\n\n").unwrap();
        let chunks = chunker.split("first part\n\nsecond part", &Metadata::new());
        // Both segments fit in one chunk, joined by the separator.
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "first part\n\nsecond part");
    }

    #[test]
    fn size_bound_holds_for_every_chunk() {
        let chunker = TextChunker::new(40, 8, "\n\n").unwrap();
        let text = "Rust is a systems programming language focused on safety.\n\n\
                    It achieves memory safety without garbage collection.\n\n\
                    The borrow checker enforces ownership rules at compile time.";
        let chunks = chunker.split(text, &meta("rust.txt"));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(
                chunk.content.chars().count() <= 40,
                "chunk exceeds bound: {:?}",
                chunk.content
            );
        }
    }

    #[test]
    fn overlap_scenario_carries_predecessor_tail() {
        let chunker = TextChunker::new(10, 3, "\n\n").unwrap();
        let chunks = chunker.split("ABCDEFGHIJ\n\nKLMNOPQRST", &Metadata::new());

        assert_eq!(chunks[0].content, "ABCDEFGHIJ");
        // The second chunk starts with the first chunk's last 3 characters
        // prefixed before the new segment.
        assert!(chunks[1].content.starts_with("HIJKLM"));
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 10);
        }
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].content.chars().collect();
            let tail: String = prev[prev.len() - 3..].iter().collect();
            assert!(pair[1].content.starts_with(&tail));
        }
    }

    #[test]
    fn zero_overlap_produces_disjoint_chunks() {
        let chunker = TextChunker::new(10, 0, "\n\n").unwrap();
        let chunks = chunker.split("ABCDEFGHIJ\n\nKLMNOPQRST", &Metadata::new());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "ABCDEFGHIJ");
        assert_eq!(chunks[1].content, "KLMNOPQRST");
    }

    #[test]
    fn long_segment_goes_through_character_windows() {
        let chunker = TextChunker::new(20, 5, " ~ ").unwrap();
        let text = "a very long unbroken segment that exceeds the chunk size by a wide margin";
        let chunks = chunker.split(text, &Metadata::new());
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 20);
        }
        // Whole words survive the window cuts.
        assert!(chunks[0].content.ends_with("long") || !chunks[0].content.contains("  "));
    }

    #[test]
    fn early_whitespace_cut_does_not_lose_characters() {
        // The only whitespace sits inside the overlap span of the first
        // window, forcing the cut-then-resume path.
        let chunker = TextChunker::new(20, 5, "\n\n").unwrap();
        let text = "a bcdefghijklmnopqrstuvwxyz0123456789";
        let chunks = chunker.split(text, &Metadata::new());

        let joined: String = chunks.iter().map(|c| c.content.as_str()).collect();
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            assert!(joined.contains(ch), "character {ch:?} lost during chunking");
        }
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 20);
        }
    }

    #[test]
    fn chunk_coverage_reconstructs_text_without_overlap() {
        let chunker = TextChunker::new(25, 0, "\n\n").unwrap();
        let text = "alpha beta gamma\n\ndelta epsilon\n\nzeta eta theta";
        let chunks = chunker.split(text, &Metadata::new());
        let rebuilt: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt.join("\n\n"), text);
    }

    #[test]
    fn split_is_deterministic() {
        let chunker = TextChunker::new(35, 7, "\n\n").unwrap();
        let text = "one two three\n\nfour five six seven\n\neight nine ten eleven twelve";
        let first = chunker.split(text, &meta("doc.txt"));
        let second = chunker.split(text, &meta("doc.txt"));
        assert_eq!(first, second);
    }

    #[test]
    fn ids_and_metadata_are_derived_from_source() {
        let chunker = TextChunker::new(10, 0, "\n\n").unwrap();
        let chunks = chunker.split("ABCDEFGHIJ\n\nKLMNOPQRST", &meta("notes.md"));

        assert_eq!(chunks[0].id, "notes.md_chunk_0");
        assert_eq!(chunks[1].id, "notes.md_chunk_1");
        assert_eq!(chunks[1].metadata.get("chunk_index"), Some(&1usize.into()));
        assert_eq!(chunks[0].metadata.get("chunk_size"), Some(&10usize.into()));
    }

    #[test]
    fn missing_source_falls_back_to_unknown() {
        let chunker = TextChunker::new(100, 0, "\n\n").unwrap();
        let chunks = chunker.split("some text", &Metadata::new());
        assert_eq!(chunks[0].id, "unknown_chunk_0");
    }

    #[test]
    fn multibyte_text_is_counted_in_characters() {
        let chunker = TextChunker::new(12, 3, "\n\n").unwrap();
        let text = "çok güzel bir gün\n\nyarın yağmur yağacak";
        let chunks = chunker.split(text, &Metadata::new());
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 12);
        }
    }

    #[test]
    fn split_documents_adds_doc_index_in_order() {
        let chunker = TextChunker::new(100, 0, "\n\n").unwrap();
        let documents = vec![
            Document { content: "first document".to_string(), metadata: meta("a.txt") },
            Document { content: "second document".to_string(), metadata: meta("b.txt") },
        ];
        let chunks = chunker.split_documents(&documents);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.get("doc_index"), Some(&0usize.into()));
        assert_eq!(chunks[1].metadata.get("doc_index"), Some(&1usize.into()));
        assert_eq!(chunks[1].id, "b.txt_chunk_0");
    }
}
