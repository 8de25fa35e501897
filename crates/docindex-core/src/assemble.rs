//! Turns splitter output into identified, traceable chunk records.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Chunk, ChunkMetadata};

/// Build one [`Chunk`] per input string.
///
/// Record `i` carries the `i`-th string as its text and `i` as its
/// `chunk_index`. Ids take the form `"{document_id}_chunk_{uuid}"` with a
/// fresh random v4 UUID per record, so assembling the same input twice
/// never yields a repeated id.
///
/// Fails with [`Error::InvalidInput`] when `document_id` is blank or any
/// chunk text is empty; nothing is returned in that case.
///
/// ```rust
/// use docindex_core::assemble;
///
/// let chunks = assemble("doc1.txt", &["a", "b"]).unwrap();
/// assert_eq!(chunks[1].text, "b");
/// assert_eq!(chunks[1].metadata.chunk_index, 1);
/// assert!(chunks[0].id.starts_with("doc1.txt_chunk_"));
/// ```
pub fn assemble<S: AsRef<str>>(document_id: &str, chunks: &[S]) -> Result<Vec<Chunk>> {
    if document_id.trim().is_empty() {
        return Err(Error::InvalidInput(
            "document_id must not be empty".to_string(),
        ));
    }
    if let Some(pos) = chunks.iter().position(|c| c.as_ref().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "chunk {} of '{}' is empty",
            pos, document_id
        )));
    }

    Ok(chunks
        .iter()
        .enumerate()
        .map(|(index, text)| Chunk {
            id: format!("{}_chunk_{}", document_id, Uuid::new_v4()),
            text: text.as_ref().to_string(),
            metadata: ChunkMetadata {
                source: document_id.to_string(),
                chunk_index: index,
            },
        })
        .collect())
}
