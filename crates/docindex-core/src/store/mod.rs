//! Collection sink abstraction.
//!
//! A [`CollectionSink`] is the indexing backend that receives assembled
//! chunk records. The pipeline holds it as an explicit handle
//! (`Arc<dyn CollectionSink>`) passed in by the caller; there is no
//! process-wide client.
//!
//! Implementations must be `Send + Sync` so the handle can be shared with
//! async tasks.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Chunk, ChunkBatch};

/// Per-source chunk count, as reported by [`CollectionSink::sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: String,
    pub chunks: u64,
}

/// Abstract collection backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add`](CollectionSink::add) | Insert a batch of chunk records |
/// | [`replace_source`](CollectionSink::replace_source) | Swap one source's chunks for a new set, atomically |
/// | [`replace_batch`](CollectionSink::replace_batch) | `replace_source` for every document of a batch |
/// | [`remove_source`](CollectionSink::remove_source) | Delete every chunk of one source |
/// | [`chunks_for_source`](CollectionSink::chunks_for_source) | Read one source back, ordered by index |
/// | [`count`](CollectionSink::count) | Total chunks in the collection |
/// | [`sources`](CollectionSink::sources) | Chunk counts per source |
#[async_trait]
pub trait CollectionSink: Send + Sync {
    /// Collection name (e.g. `"my_docs"`).
    fn name(&self) -> &str;

    /// Insert a batch of records. Ids are unique; inserting an id that is
    /// already present is an error.
    async fn add(&self, chunks: &[Chunk]) -> Result<()>;

    /// Replace every chunk of `source` with `chunks`. Returns how many
    /// earlier chunks were removed.
    ///
    /// All-or-nothing: if the call fails, the chunks previously stored for
    /// `source` are still there. Every chunk must belong to `source`.
    async fn replace_source(&self, source: &str, chunks: &[Chunk]) -> Result<u64>;

    /// Replace each document of `batch` as [`replace_source`] would.
    /// Returns how many documents had earlier chunks.
    ///
    /// The default replaces document by document, so a failure can leave
    /// earlier documents of the batch written; none is ever left half
    /// replaced. Backends with transactions may apply the whole batch at once.
    ///
    /// [`replace_source`]: CollectionSink::replace_source
    async fn replace_batch(&self, batch: &ChunkBatch) -> Result<u64> {
        let mut replaced = 0;
        for (source, chunks) in batch.iter_documents() {
            if self.replace_source(source, chunks).await? > 0 {
                replaced += 1;
            }
        }
        Ok(replaced)
    }

    /// Remove all chunks whose source is `source`. Returns how many were removed.
    async fn remove_source(&self, source: &str) -> Result<u64>;

    /// All chunks of `source`, ordered by `chunk_index`.
    async fn chunks_for_source(&self, source: &str) -> Result<Vec<Chunk>>;

    async fn count(&self) -> Result<u64>;

    /// Chunk counts per source, sorted by source.
    async fn sources(&self) -> Result<Vec<SourceSummary>>;
}
