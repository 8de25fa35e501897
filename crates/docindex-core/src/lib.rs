//! # docindex core
//!
//! Pure text-processing logic for docindex: the normalizer, the recursive
//! chunk splitter, the chunk assembler, the shared data model, and the
//! collection sink abstraction.
//!
//! This crate performs no filesystem or network I/O. Readers, the
//! directory scanner, and persistent sinks live in the `docindex` crate.
//!
//! ```rust
//! use docindex_core::{assemble, normalize, TextSplitter};
//!
//! let text = normalize("\u{feff}Hello\tworld\n\n\n\nSecond paragraph.");
//! let pieces = TextSplitter::default().split(&text);
//! let chunks = assemble("notes.txt", &pieces).unwrap();
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].text, "Hello world\n\nSecond paragraph.");
//! ```

pub mod assemble;
pub mod chunk;
pub mod error;
pub mod models;
pub mod normalize;
pub mod store;

pub use assemble::assemble;
pub use chunk::{split_text, TextSplitter, DEFAULT_MAX_SIZE, DEFAULT_OVERLAP};
pub use error::{Error, Result};
pub use models::{Chunk, ChunkBatch, ChunkMetadata};
pub use normalize::normalize;
pub use store::CollectionSink;
