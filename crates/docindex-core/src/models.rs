//! Data types that flow from the assembler into a collection sink.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata attached to every chunk record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier of the document the chunk was cut from.
    pub source: String,
    /// Position of the chunk within its document's chunk sequence.
    pub chunk_index: usize,
}

/// One indexable segment of a document.
///
/// This is the `(id, text, metadata)` triple a [`CollectionSink`](crate::store::CollectionSink)
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    pub fn chunk_index(&self) -> usize {
        self.metadata.chunk_index
    }
}

/// All chunks produced for the documents of a single pipeline run.
///
/// Chunks are only accepted together with the document they were cut
/// from, so every chunk's source always names a processed document.
#[derive(Debug, Clone, Default)]
pub struct ChunkBatch {
    documents: Vec<String>,
    chunks: Vec<Chunk>,
    /// End offset in `chunks` of each document's run.
    ends: Vec<usize>,
}

impl ChunkBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `document_id` as processed and append its chunks.
    ///
    /// Fails if any chunk names a different source. A document with zero
    /// chunks (empty text) is still recorded as processed.
    pub fn push_document(&mut self, document_id: &str, chunks: Vec<Chunk>) -> Result<()> {
        if let Some(stray) = chunks.iter().find(|c| c.source() != document_id) {
            return Err(Error::InvalidInput(format!(
                "chunk {} belongs to '{}', not '{}'",
                stray.id,
                stray.source(),
                document_id
            )));
        }
        self.documents.push(document_id.to_string());
        self.chunks.extend(chunks);
        self.ends.push(self.chunks.len());
        Ok(())
    }

    /// Each processed document with its own chunks, in push order.
    pub fn iter_documents(&self) -> impl Iterator<Item = (&str, &[Chunk])> + '_ {
        let starts = std::iter::once(0).chain(self.ends.iter().copied());
        self.documents
            .iter()
            .zip(starts.zip(self.ends.iter().copied()))
            .map(|(doc, (start, end))| (doc.as_str(), &self.chunks[start..end]))
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}
