//! Per-format document readers and the registry that dispatches to them.
//!
//! Readers turn a file on disk into raw UTF-8 text; normalization happens
//! later in the pipeline. Dispatch is keyed by the lowercased file
//! extension.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ReaderRegistry              │
//! │  ┌──────┐ ┌──────┐ ┌──────────┐ ┌─────┐  │
//! │  │ pdf  │ │ txt  │ │    md    │ │ csv │  │
//! │  └──────┘ └──────┘ └──────────┘ └─────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!        read_document(path) → raw text
//! ```
//!
//! The registry is built explicitly with [`ReaderRegistry::with_defaults`]
//! once all reader types exist; further readers can be added with
//! [`ReaderRegistry::register`].

use std::collections::HashMap;
use std::path::Path;

use docindex_core::{Error, Result};

use crate::connector_fs::extension_of;

/// Extensions handled by the default registry.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "txt", "md", "csv"];

/// Extracts raw text from one file format.
pub trait DocumentReader: Send + Sync {
    /// Short reader name used in logs (e.g. `"pdf"`).
    fn name(&self) -> &str;

    /// Lowercased extensions (without the dot) this reader handles.
    fn extensions(&self) -> &[&str];

    /// Read `path` and return its text. The path is known to be a file.
    fn read(&self, path: &Path) -> Result<String>;
}

/// PDF text extraction via `pdf-extract`.
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = read_bytes(path)?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| Error::Extract {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Plain text, read verbatim.
pub struct TextReader;

impl DocumentReader for TextReader {
    fn name(&self) -> &str {
        "txt"
    }

    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn read(&self, path: &Path) -> Result<String> {
        read_utf8(path)
    }
}

/// Markdown, read verbatim (markup is kept).
pub struct MarkdownReader;

impl DocumentReader for MarkdownReader {
    fn name(&self) -> &str {
        "md"
    }

    fn extensions(&self) -> &[&str] {
        &["md"]
    }

    fn read(&self, path: &Path) -> Result<String> {
        read_utf8(path)
    }
}

/// CSV rendered as text: one line per row, fields joined by `", "`.
///
/// The header row is treated like any other row.
pub struct CsvReader;

impl DocumentReader for CsvReader {
    fn name(&self) -> &str {
        "csv"
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = read_bytes(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::Extract {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            rows.push(record.iter().collect::<Vec<_>>().join(", "));
        }
        Ok(rows.join("\n"))
    }
}

/// Extension-keyed reader dispatch.
pub struct ReaderRegistry {
    readers: Vec<Box<dyn DocumentReader>>,
    by_extension: HashMap<String, usize>,
}

impl ReaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Registry with the PDF, text, Markdown, and CSV readers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PdfReader));
        registry.register(Box::new(TextReader));
        registry.register(Box::new(MarkdownReader));
        registry.register(Box::new(CsvReader));
        registry
    }

    /// Add a reader. A later reader takes over any extension it shares with
    /// an earlier one.
    pub fn register(&mut self, reader: Box<dyn DocumentReader>) {
        let idx = self.readers.len();
        for ext in reader.extensions() {
            self.by_extension.insert(ext.to_lowercase(), idx);
        }
        self.readers.push(reader);
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.by_extension.contains_key(&extension.to_lowercase())
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(|s| s.as_str()).collect();
        exts.sort();
        exts
    }

    /// Read one document, dispatching on its lowercased extension.
    pub fn read_document(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let ext = extension_of(path).unwrap_or_default();
        let reader = self
            .by_extension
            .get(&ext)
            .map(|&idx| &self.readers[idx])
            .ok_or_else(|| Error::UnsupportedFormat(format!(".{}", ext)))?;

        tracing::debug!(path = %path.display(), reader = reader.name(), "reading document");
        reader.read(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_utf8(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| Error::Extract {
        path: path.to_path_buf(),
        message: format!("invalid UTF-8: {}", e.utf8_error()),
    })
}
