//! In-memory [`CollectionSink`] for tests and dry runs.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`, in insertion order.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::Chunk;

use super::{CollectionSink, SourceSummary};

pub struct InMemoryCollection {
    name: String,
    chunks: RwLock<Vec<Chunk>>,
}

impl InMemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Copy of every stored record, in insertion order.
    pub fn snapshot(&self) -> Vec<Chunk> {
        self.chunks.read().unwrap().clone()
    }
}

impl Default for InMemoryCollection {
    fn default() -> Self {
        Self::new("my_docs")
    }
}

#[async_trait]
impl CollectionSink for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        let mut stored = self.chunks.write().unwrap();
        let mut ids: HashSet<&str> = stored.iter().map(|c| c.id.as_str()).collect();
        for chunk in chunks {
            if !ids.insert(chunk.id.as_str()) {
                bail!("duplicate chunk id in collection '{}': {}", self.name, chunk.id);
            }
        }
        stored.extend_from_slice(chunks);
        Ok(())
    }

    async fn replace_source(&self, source: &str, chunks: &[Chunk]) -> Result<u64> {
        let mut stored = self.chunks.write().unwrap();
        check_replacement(&self.name, &stored, source, chunks)?;

        let before = stored.len();
        stored.retain(|c| c.source() != source);
        let removed = (before - stored.len()) as u64;
        stored.extend_from_slice(chunks);
        Ok(removed)
    }

    async fn remove_source(&self, source: &str) -> Result<u64> {
        let mut stored = self.chunks.write().unwrap();
        let before = stored.len();
        stored.retain(|c| c.source() != source);
        Ok((before - stored.len()) as u64)
    }

    async fn chunks_for_source(&self, source: &str) -> Result<Vec<Chunk>> {
        let stored = self.chunks.read().unwrap();
        let mut chunks: Vec<Chunk> = stored
            .iter()
            .filter(|c| c.source() == source)
            .cloned()
            .collect();
        chunks.sort_by_key(|c| c.chunk_index());
        Ok(chunks)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.chunks.read().unwrap().len() as u64)
    }

    async fn sources(&self) -> Result<Vec<SourceSummary>> {
        let stored = self.chunks.read().unwrap();
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for chunk in stored.iter() {
            *counts.entry(chunk.source()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(source, chunks)| SourceSummary {
                source: source.to_string(),
                chunks,
            })
            .collect())
    }
}

/// Validate `chunks` as the new content of `source` before anything is
/// touched: all of them belong to `source`, and their ids clash neither
/// with each other nor with chunks of other sources.
fn check_replacement(name: &str, stored: &[Chunk], source: &str, chunks: &[Chunk]) -> Result<()> {
    if let Some(stray) = chunks.iter().find(|c| c.source() != source) {
        bail!(
            "chunk {} belongs to '{}', not '{}'",
            stray.id,
            stray.source(),
            source
        );
    }
    let mut ids: HashSet<&str> = stored
        .iter()
        .filter(|c| c.source() != source)
        .map(|c| c.id.as_str())
        .collect();
    for chunk in chunks {
        if !ids.insert(chunk.id.as_str()) {
            bail!("duplicate chunk id in collection '{}': {}", name, chunk.id);
        }
    }
    Ok(())
}
