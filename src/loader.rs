//! Document loading from files, directories, and literal text.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::document::{Document, Metadata};

/// Extensions the loader will read.
const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Loads plain-text and markdown documents with provenance metadata.
///
/// Every loaded [`Document`] carries `source`, `filename`, `char_count`,
/// `line_count`, and `loaded_at` metadata; file-backed documents add
/// `extension` and `size_bytes`.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single file.
    ///
    /// Returns `None` (with a warning) for a missing file, an unsupported
    /// extension, or a read failure.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Option<Document> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "file not found");
            return None;
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            warn!(path = %path.display(), extension, "unsupported file format");
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                return None;
            }
        };

        let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let filename =
            path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string();

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), path.display().to_string().into());
        metadata.insert("filename".to_string(), filename.into());
        metadata.insert("extension".to_string(), extension.into());
        metadata.insert("size_bytes".to_string(), (size_bytes as i64).into());
        metadata.insert("loaded_at".to_string(), Utc::now().to_rfc3339().into());
        metadata.insert("char_count".to_string(), content.chars().count().into());
        metadata.insert("line_count".to_string(), (content.lines().count().max(1)).into());

        debug!(path = %path.display(), chars = content.chars().count(), "loaded file");
        Some(Document { content, metadata })
    }

    /// Load every supported file in a directory, in sorted path order.
    ///
    /// Returns an empty `Vec` if the path does not exist or is not a
    /// directory.
    pub fn load_directory(&self, path: impl AsRef<Path>, recursive: bool) -> Vec<Document> {
        let path = path.as_ref();

        if !path.is_dir() {
            warn!(path = %path.display(), "not a directory");
            return Vec::new();
        }

        let mut files = Vec::new();
        collect_files(path, recursive, &mut files);
        files.sort();

        let documents: Vec<Document> =
            files.iter().filter_map(|file| self.load_file(file)).collect();

        debug!(path = %path.display(), documents = documents.len(), "loaded directory");
        documents
    }

    /// Build a document from literal text.
    pub fn load_text(&self, text: impl Into<String>, source: impl Into<String>) -> Document {
        let content = text.into();
        let source = source.into();

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), source.clone().into());
        metadata.insert("filename".to_string(), source.into());
        metadata.insert("loaded_at".to_string(), Utc::now().to_rfc3339().into());
        metadata.insert("char_count".to_string(), content.chars().count().into());
        metadata.insert("line_count".to_string(), (content.lines().count().max(1)).into());

        Document { content, metadata }
    }
}

fn collect_files(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!(path = %dir.display(), "failed to read directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, files);
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn load_text_attaches_provenance() {
        let loader = DocumentLoader::new();
        let doc = loader.load_text("line one\nline two", "manual_input");

        assert_eq!(doc.content, "line one\nline two");
        assert_eq!(doc.metadata.get("source"), Some(&"manual_input".into()));
        assert_eq!(doc.metadata.get("filename"), Some(&"manual_input".into()));
        assert_eq!(doc.metadata.get("line_count"), Some(&2usize.into()));
    }

    #[test]
    fn missing_and_unsupported_files_yield_none() {
        let loader = DocumentLoader::new();
        assert!(loader.load_file("/nonexistent/file.txt").is_none());

        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        fs::write(&pdf, "binary").unwrap();
        assert!(loader.load_file(&pdf).is_none());
    }

    #[test]
    fn load_file_reads_supported_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Heading\n\nSome text.").unwrap();

        let loader = DocumentLoader::new();
        let doc = loader.load_file(&path).unwrap();
        assert_eq!(doc.content, "# Heading\n\nSome text.");
        assert_eq!(doc.metadata.get("filename"), Some(&"notes.md".into()));
        assert_eq!(doc.metadata.get("extension"), Some(&"md".into()));
    }

    #[test]
    fn load_directory_is_sorted_and_optionally_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("skip.bin"), "x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("c.md"), "c").unwrap();

        let loader = DocumentLoader::new();

        let flat = loader.load_directory(dir.path(), false);
        let names: Vec<String> =
            flat.iter().map(|d| d.metadata.get("filename").unwrap().to_string()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);

        let deep = loader.load_directory(dir.path(), true);
        assert_eq!(deep.len(), 3);
    }
}
