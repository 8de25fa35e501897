//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow: read → normalize → split → assemble → sink.
//! Reading and chunking run on tokio's blocking pool with up to
//! `concurrency` documents in flight; results are consumed in input order
//! and written to the sink in batches. A document that cannot be read is
//! logged and skipped.
//!
//! Re-ingesting a document replaces its previous chunks in the collection.
//! The swap is atomic per document: a failed write keeps the old chunks.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use docindex_core::store::memory::InMemoryCollection;
use docindex_core::{assemble, normalize, Chunk, ChunkBatch, CollectionSink, Error, TextSplitter};

use crate::config::Config;
use crate::connector_fs::scan_directory;
use crate::extract::ReaderRegistry;
use crate::progress::{IngestProgressEvent, IngestProgressReporter};
use crate::sqlite_store::SqliteCollection;

/// Finished-but-unconsumed documents allowed per worker, so one slow
/// document does not idle the others.
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Sizing knobs for [`Pipeline`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Chunks buffered before they are written in one sink call.
    pub batch_size: usize,
    /// Documents read and chunked at the same time.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: 256,
            concurrency: 4,
        }
    }
}

/// A document that was dropped from a run, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of [`Pipeline::ingest_paths`].
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Documents chunked and written.
    pub documents: u64,
    pub chunks: u64,
    /// Documents whose earlier chunks were replaced.
    pub replaced: u64,
    pub skipped: Vec<SkippedDocument>,
}

/// One document's chunks, tagged with the id they were assembled under.
#[derive(Debug)]
struct ChunkedDocument {
    id: String,
    chunks: Vec<Chunk>,
}

type Outcome = docindex_core::Result<ChunkedDocument>;

/// Normalize, split, and assemble one document's raw text.
///
/// Text that is blank after normalization yields no chunks.
pub fn process_document(
    splitter: &TextSplitter,
    document_id: &str,
    raw: &str,
) -> docindex_core::Result<Vec<Chunk>> {
    let text = normalize(raw);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let pieces = splitter.split(&text);
    assemble(document_id, &pieces)
}

/// The identifier chunks of `path` are attributed to: the path itself.
///
/// Paths that are not valid UTF-8 are rejected. A lossy rendering could
/// give two files the same id, and replacing one would drop the other.
pub fn document_id_for(path: &Path) -> docindex_core::Result<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        Error::InvalidInput(format!("path is not valid UTF-8: {}", path.display()))
    })
}

fn read_and_chunk(registry: &ReaderRegistry, splitter: &TextSplitter, path: &Path) -> Outcome {
    let id = document_id_for(path)?;
    let raw = registry.read_document(path)?;
    let chunks = process_document(splitter, &id, &raw)?;
    Ok(ChunkedDocument { id, chunks })
}

pub struct Pipeline {
    registry: Arc<ReaderRegistry>,
    splitter: TextSplitter,
    sink: Arc<dyn CollectionSink>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        registry: ReaderRegistry,
        splitter: TextSplitter,
        sink: Arc<dyn CollectionSink>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            splitter,
            sink,
            options: PipelineOptions {
                batch_size: options.batch_size.max(1),
                concurrency: options.concurrency.max(1),
            },
        }
    }

    /// Pipeline with the default readers and the configured chunking and
    /// batching, writing to `sink`.
    pub fn from_config(config: &Config, sink: Arc<dyn CollectionSink>) -> Result<Self> {
        Ok(Self::new(
            ReaderRegistry::with_defaults(),
            config.chunking.splitter()?,
            sink,
            PipelineOptions {
                batch_size: config.ingest.batch_size,
                concurrency: config.ingest.concurrency,
            },
        ))
    }

    pub fn sink(&self) -> &Arc<dyn CollectionSink> {
        &self.sink
    }

    pub fn process_text(&self, document_id: &str, raw: &str) -> docindex_core::Result<Vec<Chunk>> {
        process_document(&self.splitter, document_id, raw)
    }

    /// Chunk already-extracted text and store it under `document_id`,
    /// replacing any earlier chunks of that document.
    pub async fn ingest_text(&self, document_id: &str, raw: &str) -> Result<Vec<Chunk>> {
        let chunks = self.process_text(document_id, raw)?;
        self.sink
            .replace_source(document_id, &chunks)
            .await
            .with_context(|| format!("Failed to write chunks of {}", document_id))?;
        Ok(chunks)
    }

    /// Read and chunk `paths` without touching the sink.
    pub async fn collect_batch(
        &self,
        paths: &[PathBuf],
    ) -> Result<(ChunkBatch, Vec<SkippedDocument>)> {
        let mut batch = ChunkBatch::new();
        let mut skipped = Vec::new();

        let mut queue = DocumentQueue::new(self, paths);
        while let Some((path, outcome)) = queue.next().await? {
            match outcome {
                Ok(doc) => batch.push_document(&doc.id, doc.chunks)?,
                Err(e) => skipped.push(skip(path, e)),
            }
        }

        Ok((batch, skipped))
    }

    /// Read, chunk, and write every document in `paths`.
    pub async fn ingest_paths(
        &self,
        target: &str,
        paths: &[PathBuf],
        reporter: &dyn IngestProgressReporter,
    ) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut pending = ChunkBatch::new();
        let total = paths.len() as u64;
        let mut done = 0u64;

        tracing::info!(
            scope = target,
            documents = total,
            collection = self.sink.name(),
            "ingest started"
        );

        let mut queue = DocumentQueue::new(self, paths);
        while let Some((path, outcome)) = queue.next().await? {
            done += 1;
            match outcome {
                Ok(doc) => {
                    tracing::debug!(
                        document = %doc.id,
                        chunks = doc.chunks.len(),
                        "document chunked"
                    );
                    report.documents += 1;
                    report.chunks += doc.chunks.len() as u64;
                    pending.push_document(&doc.id, doc.chunks)?;
                    if pending.len() >= self.options.batch_size {
                        report.replaced += self.flush(&mut pending).await?;
                    }
                }
                Err(e) => report.skipped.push(skip(path, e)),
            }
            reporter.report(IngestProgressEvent::Ingesting {
                target: target.to_string(),
                n: done,
                total,
            });
        }
        report.replaced += self.flush(&mut pending).await?;

        tracing::info!(
            documents = report.documents,
            chunks = report.chunks,
            replaced = report.replaced,
            skipped = report.skipped.len(),
            "ingest finished"
        );
        Ok(report)
    }

    /// Write the buffered documents, each replacing its earlier chunks.
    /// Returns how many documents had earlier chunks.
    async fn flush(&self, pending: &mut ChunkBatch) -> Result<u64> {
        let batch = std::mem::take(pending);
        if batch.documents().is_empty() {
            return Ok(0);
        }
        self.sink.replace_batch(&batch).await.with_context(|| {
            format!(
                "Failed to write {} chunks of {} documents",
                batch.len(),
                batch.documents().len()
            )
        })
    }
}

/// Reads and chunks documents in the background, yielding results in input
/// order.
///
/// A semaphore keeps `concurrency` documents in progress; up to
/// `concurrency * QUEUE_DEPTH_PER_WORKER` are queued, so documents behind a
/// slow one keep being processed while it runs.
struct DocumentQueue<'a> {
    registry: Arc<ReaderRegistry>,
    splitter: TextSplitter,
    permits: Arc<Semaphore>,
    depth: usize,
    remaining: std::slice::Iter<'a, PathBuf>,
    in_flight: VecDeque<JoinHandle<(PathBuf, Outcome)>>,
}

impl<'a> DocumentQueue<'a> {
    fn new(pipeline: &Pipeline, paths: &'a [PathBuf]) -> Self {
        let concurrency = pipeline.options.concurrency;
        Self {
            registry: Arc::clone(&pipeline.registry),
            splitter: pipeline.splitter,
            permits: Arc::new(Semaphore::new(concurrency)),
            depth: concurrency * QUEUE_DEPTH_PER_WORKER,
            remaining: paths.iter(),
            in_flight: VecDeque::new(),
        }
    }

    /// The next document in input order, or `None` once all are consumed.
    async fn next(&mut self) -> Result<Option<(PathBuf, Outcome)>> {
        while self.in_flight.len() < self.depth {
            match self.remaining.next() {
                Some(path) => {
                    let handle = self.spawn(path.clone());
                    self.in_flight.push_back(handle);
                }
                None => break,
            }
        }

        match self.in_flight.pop_front() {
            Some(handle) => Ok(Some(handle.await?)),
            None => Ok(None),
        }
    }

    fn spawn(&self, path: PathBuf) -> JoinHandle<(PathBuf, Outcome)> {
        let registry = Arc::clone(&self.registry);
        let splitter = self.splitter;
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            // Held until the document is read and chunked.
            let _permit = permits.acquire_owned().await;
            let task_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                read_and_chunk(&registry, &splitter, &task_path)
            })
            .await
            // A reader that panics fails its document, not the run.
            .unwrap_or_else(|e| {
                Err(Error::Extract {
                    path: path.clone(),
                    message: if e.is_panic() {
                        "reader panicked".to_string()
                    } else {
                        "reader was cancelled".to_string()
                    },
                })
            });
            (path, outcome)
        })
    }
}

impl Drop for DocumentQueue<'_> {
    fn drop(&mut self) {
        for handle in &self.in_flight {
            handle.abort();
        }
    }
}

fn skip(path: PathBuf, error: Error) -> SkippedDocument {
    tracing::warn!(path = %path.display(), error = %error, "skipping document");
    SkippedDocument {
        path,
        reason: error.to_string(),
    }
}

/// Resolve `target` into the list of documents to ingest: the supported
/// files of a directory, or a single file.
pub fn resolve_target(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_dir() {
        return Ok(scan_directory(target)?);
    }
    if !target.exists() {
        return Err(Error::FileNotFound(target.to_path_buf()).into());
    }
    let path = target
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", target.display()))?;
    Ok(vec![path])
}

/// CLI entry point for `docindex ingest`.
pub async fn run_ingest(
    config: &Config,
    target: &Path,
    dry_run: bool,
    reporter: &dyn IngestProgressReporter,
) -> Result<IngestReport> {
    let label = target.display().to_string();
    reporter.report(IngestProgressEvent::Discovering {
        target: label.clone(),
    });
    let paths = resolve_target(target)?;

    if dry_run {
        let sink = Arc::new(InMemoryCollection::new(config.collection.name.clone()));
        let pipeline = Pipeline::from_config(config, sink)?;
        let (batch, skipped) = pipeline.collect_batch(&paths).await?;

        println!("ingest {} (dry-run)", label);
        println!("  documents found: {}", paths.len());
        println!("  documents chunked: {}", batch.documents().len());
        println!("  estimated chunks: {}", batch.len());
        print_skipped(&skipped);

        return Ok(IngestReport {
            documents: batch.documents().len() as u64,
            chunks: batch.len() as u64,
            replaced: 0,
            skipped,
        });
    }

    let sink = Arc::new(SqliteCollection::open(config).await?);
    let pipeline = Pipeline::from_config(config, sink.clone())?;
    let report = pipeline.ingest_paths(&label, &paths, reporter).await?;

    println!("ingest {}", label);
    println!("  collection: {}", config.collection.name);
    println!("  documents found: {}", paths.len());
    println!("  documents ingested: {}", report.documents);
    println!("  documents replaced: {}", report.replaced);
    println!("  chunks written: {}", report.chunks);
    print_skipped(&report.skipped);
    println!("ok");

    sink.close().await;
    Ok(report)
}

fn print_skipped(skipped: &[SkippedDocument]) {
    if skipped.is_empty() {
        return;
    }
    println!("  skipped: {}", skipped.len());
    for s in skipped {
        println!("    {}: {}", s.path.display(), s.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentReader;
    use crate::progress::NoProgress;
    use anyhow::bail;
    use async_trait::async_trait;
    use docindex_core::store::SourceSummary;
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    fn pipeline(sink: Arc<dyn CollectionSink>, max: usize, overlap: usize) -> Pipeline {
        Pipeline::new(
            ReaderRegistry::with_defaults(),
            TextSplitter::new(max, overlap).unwrap(),
            sink,
            PipelineOptions {
                batch_size: 3,
                concurrency: 2,
            },
        )
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<IngestProgressEvent>>);

    impl IngestProgressReporter for Recorder {
        fn report(&self, event: IngestProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    /// In-memory sink whose writes can be switched to fail.
    #[derive(Default)]
    struct FailingSink {
        inner: InMemoryCollection,
        failing: AtomicBool,
    }

    impl FailingSink {
        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                bail!("disk full");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CollectionSink for FailingSink {
        fn name(&self) -> &str {
            self.inner.name()
        }

        async fn add(&self, chunks: &[Chunk]) -> Result<()> {
            self.check()?;
            self.inner.add(chunks).await
        }

        async fn replace_source(&self, source: &str, chunks: &[Chunk]) -> Result<u64> {
            self.check()?;
            self.inner.replace_source(source, chunks).await
        }

        async fn remove_source(&self, source: &str) -> Result<u64> {
            self.inner.remove_source(source).await
        }

        async fn chunks_for_source(&self, source: &str) -> Result<Vec<Chunk>> {
            self.inner.chunks_for_source(source).await
        }

        async fn count(&self) -> Result<u64> {
            self.inner.count().await
        }

        async fn sources(&self) -> Result<Vec<SourceSummary>> {
            self.inner.sources().await
        }
    }

    #[test]
    fn process_document_normalizes_before_splitting() {
        let splitter = TextSplitter::default();
        let chunks =
            process_document(&splitter, "doc.txt", "\u{feff}Hello\t\tworld\n\n\n\nBye").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world\n\nBye");
        assert_eq!(chunks[0].metadata.source, "doc.txt");
    }

    #[test]
    fn blank_document_has_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(process_document(&splitter, "blank.txt", " \n\x00\u{200b}\t")
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn ingest_text_replaces_previous_chunks() {
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 40, 10);
        let long = "Sentence number one. ".repeat(10);

        let first = p.ingest_text("notes", &long).await.unwrap();
        assert!(first.len() > 1);
        let second = p.ingest_text("notes", "short now").await.unwrap();
        assert_eq!(second.len(), 1);

        let stored = sink.chunks_for_source("notes").await.unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn ingest_paths_writes_batches_and_skips_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Alpha paragraph.\n\n\n\nStill alpha.").unwrap();
        fs::write(dir.path().join("b.md"), "# Beta\n\n".repeat(30)).unwrap();
        fs::write(dir.path().join("c.csv"), "k,v\n1,2").unwrap();
        fs::write(dir.path().join("d.pdf"), "not really a pdf").unwrap();
        fs::write(dir.path().join("e.txt"), "").unwrap();

        let paths = scan_directory(dir.path()).unwrap();
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 50, 10);
        let recorder = Recorder::default();

        let report = p.ingest_paths("test", &paths, &recorder).await.unwrap();
        assert_eq!(report.documents, 4);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("d.pdf"));
        assert_eq!(report.chunks, sink.count().await.unwrap());

        let a_id = document_id_for(&paths[0]).unwrap();
        let a = sink.chunks_for_source(&a_id).await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].text, "Alpha paragraph.\n\nStill alpha.");
        assert!(a[0].id.starts_with(&format!("{}_chunk_", a_id)));

        let c_id = document_id_for(&paths[2]).unwrap();
        let c = sink.chunks_for_source(&c_id).await.unwrap();
        assert_eq!(c[0].text, "k, v\n1, 2");

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events.last(),
            Some(&IngestProgressEvent::Ingesting {
                target: "test".to_string(),
                n: 5,
                total: 5
            })
        );
    }

    #[tokio::test]
    async fn reingest_counts_replacements() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        let paths = scan_directory(dir.path()).unwrap();
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 50, 10);

        let first = p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        assert_eq!(first.replaced, 0);
        let second = p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        assert_eq!(second.replaced, 1);
        assert_eq!(sink.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_reingest_keeps_stored_chunks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Alpha text. ".repeat(12)).unwrap();
        fs::write(dir.path().join("b.txt"), "Beta text. ".repeat(12)).unwrap();
        let paths = scan_directory(dir.path()).unwrap();

        let sink = Arc::new(FailingSink::default());
        let p = pipeline(sink.clone(), 50, 10);
        p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        let before = sink.inner.snapshot();
        assert!(before.len() > 2);

        fs::write(dir.path().join("a.txt"), "Rewritten alpha.").unwrap();
        sink.failing.store(true, Ordering::SeqCst);
        assert!(p.ingest_paths("t", &paths, &NoProgress).await.is_err());
        assert_eq!(sink.inner.snapshot(), before);

        let a_id = document_id_for(&paths[0]).unwrap();
        assert!(p.ingest_text(&a_id, "Rewritten alpha.").await.is_err());
        assert_eq!(sink.inner.snapshot(), before);
    }

    #[tokio::test]
    async fn blank_reingest_clears_old_chunks() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "content").unwrap();
        let paths = scan_directory(dir.path()).unwrap();
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 50, 10);

        p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        fs::write(&file, "   ").unwrap();
        let report = p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        assert_eq!(report.replaced, 1);
        assert_eq!(sink.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn collect_batch_leaves_sink_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        let paths = scan_directory(dir.path()).unwrap();
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 50, 10);

        let (batch, skipped) = p.collect_batch(&paths).await.unwrap();
        assert!(skipped.is_empty());
        assert_eq!(batch.documents().len(), 2);
        assert_eq!(batch.chunks()[1].text, "beta");
        assert_eq!(sink.count().await.unwrap(), 0);
    }

    /// Blocks on `gate.txt` until three other documents have been read.
    struct GatedReader {
        reads: AtomicUsize,
        open: Mutex<mpsc::Sender<()>>,
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl DocumentReader for GatedReader {
        fn name(&self) -> &str {
            "gated"
        }

        fn extensions(&self) -> &[&str] {
            &["txt"]
        }

        fn read(&self, path: &Path) -> docindex_core::Result<String> {
            if path.ends_with("gate.txt") {
                self.gate
                    .lock()
                    .unwrap()
                    .recv_timeout(Duration::from_secs(10))
                    .map_err(|_| Error::Extract {
                        path: path.to_path_buf(),
                        message: "gate never opened".to_string(),
                    })?;
                return Ok("gate".to_string());
            }
            if self.reads.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                let _ = self.open.lock().unwrap().send(());
            }
            Ok("open".to_string())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_document_does_not_stall_the_rest() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = ["gate.txt", "a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "x").unwrap();
                path
            })
            .collect();

        let (open, gate) = mpsc::channel();
        let mut registry = ReaderRegistry::new();
        registry.register(Box::new(GatedReader {
            reads: AtomicUsize::new(0),
            open: Mutex::new(open),
            gate: Mutex::new(gate),
        }));
        let sink = Arc::new(InMemoryCollection::default());
        let p = Pipeline::new(
            registry,
            TextSplitter::default(),
            sink.clone(),
            PipelineOptions {
                batch_size: 8,
                concurrency: 2,
            },
        );

        let report = p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        assert!(report.skipped.is_empty(), "{:?}", report.skipped);
        assert_eq!(report.documents, 4);

        // Results still come back in input order.
        let (batch, _) = p.collect_batch(&paths[1..]).await.unwrap();
        let order: Vec<&str> = batch.documents().iter().map(String::as_str).collect();
        let expected: Vec<String> = paths[1..]
            .iter()
            .map(|path| document_id_for(path).unwrap())
            .collect();
        assert_eq!(order, expected);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn non_utf8_paths_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let latin1 = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&latin1, "named in latin-1").unwrap();
        fs::write(dir.path().join("ok.txt"), "fine").unwrap();

        assert!(matches!(
            document_id_for(&latin1),
            Err(Error::InvalidInput(_))
        ));

        let paths = scan_directory(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        let sink = Arc::new(InMemoryCollection::default());
        let p = pipeline(sink.clone(), 50, 10);

        let report = p.ingest_paths("t", &paths, &NoProgress).await.unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("UTF-8"));
        assert_eq!(sink.count().await.unwrap(), 1);
    }

    #[test]
    fn resolve_target_variants() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x.md");
        fs::write(&file, "x").unwrap();

        assert_eq!(resolve_target(dir.path()).unwrap().len(), 1);
        assert_eq!(resolve_target(&file).unwrap(), vec![file.canonicalize().unwrap()]);
        assert!(resolve_target(&dir.path().join("missing.txt")).is_err());
    }
}
