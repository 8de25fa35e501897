//! SQLite-backed [`CollectionSink`].
//!
//! All collections share one `chunks` table; rows are scoped by the
//! collection name. Every write call ([`add`](CollectionSink::add),
//! [`replace_source`](CollectionSink::replace_source),
//! [`replace_batch`](CollectionSink::replace_batch)) runs in a single
//! transaction, so a failed write leaves the collection as it was.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqliteConnection, SqlitePool};

use docindex_core::models::{Chunk, ChunkBatch, ChunkMetadata};
use docindex_core::store::{CollectionSink, SourceSummary};

use crate::config::Config;
use crate::db;
use crate::migrate;

pub struct SqliteCollection {
    pool: SqlitePool,
    name: String,
}

impl SqliteCollection {
    /// Wrap an already-migrated pool.
    pub fn new(pool: SqlitePool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }

    /// Connect to the configured database, run migrations, and open the
    /// configured collection.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await.with_context(|| {
            format!(
                "Failed to open database: {}",
                config.collection.db_path.display()
            )
        })?;
        migrate::run_migrations(&pool).await?;
        Ok(Self::new(pool, config.collection.name.clone()))
    }

    /// Unix timestamp of the most recent write to this collection.
    pub async fn last_ingested_at(&self) -> Result<Option<i64>> {
        let ts: Option<i64> =
            sqlx::query_scalar("SELECT MAX(ingested_at) FROM chunks WHERE collection = ?")
                .bind(&self.name)
                .fetch_one(&self.pool)
                .await?;
        Ok(ts)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CollectionSink for SqliteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;
        insert_chunks(&mut *tx, &self.name, chunks, now).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_source(&self, source: &str, chunks: &[Chunk]) -> Result<u64> {
        check_sources(source, chunks)?;
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;
        let removed = delete_source(&mut *tx, &self.name, source).await?;
        insert_chunks(&mut *tx, &self.name, chunks, now).await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn replace_batch(&self, batch: &ChunkBatch) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;
        let mut replaced = 0;

        for (source, chunks) in batch.iter_documents() {
            check_sources(source, chunks)?;
            if delete_source(&mut *tx, &self.name, source).await? > 0 {
                replaced += 1;
            }
            insert_chunks(&mut *tx, &self.name, chunks, now).await?;
        }

        tx.commit().await?;
        Ok(replaced)
    }

    async fn remove_source(&self, source: &str) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        delete_source(&mut *conn, &self.name, source).await
    }

    async fn chunks_for_source(&self, source: &str) -> Result<Vec<Chunk>> {
        let rows = sqlx::query(
            "SELECT id, source, chunk_index, text FROM chunks WHERE collection = ? AND source = ? ORDER BY chunk_index",
        )
        .bind(&self.name)
        .bind(source)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let index: i64 = row.get("chunk_index");
                Chunk {
                    id: row.get("id"),
                    text: row.get("text"),
                    metadata: ChunkMetadata {
                        source: row.get("source"),
                        chunk_index: index as usize,
                    },
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE collection = ?")
            .bind(&self.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn sources(&self) -> Result<Vec<SourceSummary>> {
        let rows = sqlx::query(
            "SELECT source, COUNT(*) AS n FROM chunks WHERE collection = ? GROUP BY source ORDER BY source",
        )
        .bind(&self.name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let n: i64 = row.get("n");
                SourceSummary {
                    source: row.get("source"),
                    chunks: n as u64,
                }
            })
            .collect())
    }
}

async fn insert_chunks(
    conn: &mut SqliteConnection,
    collection: &str,
    chunks: &[Chunk],
    now: i64,
) -> Result<()> {
    for chunk in chunks {
        sqlx::query(
            "INSERT INTO chunks (collection, id, source, chunk_index, text, ingested_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(&chunk.id)
        .bind(chunk.source())
        .bind(chunk.chunk_index() as i64)
        .bind(&chunk.text)
        .bind(now)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to insert chunk {}", chunk.id))?;
    }
    Ok(())
}

async fn delete_source(conn: &mut SqliteConnection, collection: &str, source: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM chunks WHERE collection = ? AND source = ?")
        .bind(collection)
        .bind(source)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

fn check_sources(source: &str, chunks: &[Chunk]) -> Result<()> {
    if let Some(stray) = chunks.iter().find(|c| c.source() != source) {
        bail!(
            "chunk {} belongs to '{}', not '{}'",
            stray.id,
            stray.source(),
            source
        );
    }
    Ok(())
}
