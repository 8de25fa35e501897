//! Collection statistics and chunk inspection.
//!
//! Backs `docindex stats` (a summary of what the configured collection
//! holds) and `docindex chunks <source>` (the stored chunks of one
//! document, in order).

use anyhow::Result;

use docindex_core::CollectionSink;

use crate::config::Config;
use crate::ingest::document_id_for;
use crate::sqlite_store::SqliteCollection;

/// Run the stats command: query the collection and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let collection = SqliteCollection::open(config).await?;

    let total_chunks = collection.count().await?;
    let sources = collection.sources().await?;
    let last = collection.last_ingested_at().await?;

    let db_size = std::fs::metadata(&config.collection.db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("docindex: Collection Stats");
    println!("==========================");
    println!();
    println!("  Collection:  {}", collection.name());
    println!("  Database:    {}", config.collection.db_path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Documents:   {}", sources.len());
    println!("  Chunks:      {}", total_chunks);
    println!(
        "  Last ingest: {}",
        last.map(format_ts_relative)
            .unwrap_or_else(|| "never".to_string())
    );

    if !sources.is_empty() {
        println!();
        println!("  By source:");
        println!("  {:<56} {:>8}", "SOURCE", "CHUNKS");
        println!("  {}", "-".repeat(65));
        for s in &sources {
            println!("  {:<56} {:>8}", s.source, s.chunks);
        }
    }

    println!();

    collection.close().await;
    Ok(())
}

/// Print the stored chunks of `source` in index order.
///
/// A `source` naming an existing file is resolved to the absolute path
/// ingestion stored it under.
pub async fn run_chunks(config: &Config, source: &str) -> Result<()> {
    let source = match std::path::Path::new(source).canonicalize() {
        Ok(path) => document_id_for(&path).unwrap_or_else(|_| source.to_string()),
        Err(_) => source.to_string(),
    };
    let source = source.as_str();

    let collection = SqliteCollection::open(config).await?;
    let chunks = collection.chunks_for_source(source).await?;

    if chunks.is_empty() {
        println!("No chunks stored for {}", source);
    }
    for chunk in &chunks {
        println!(
            "--- [{}] {} ({} chars)",
            chunk.chunk_index(),
            chunk.id,
            chunk.text.chars().count()
        );
        println!("{}", chunk.text);
    }

    collection.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let delta = chrono::Utc::now().timestamp() - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
