//! # docindex CLI
//!
//! The `docindex` binary drives the ingestion pipeline: it initializes the
//! collection database, scans directories, ingests documents, and inspects
//! what has been stored.
//!
//! ## Usage
//!
//! ```bash
//! docindex [--config ./config/docindex.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docindex init` | Create the SQLite database and run schema migrations |
//! | `docindex scan <dir>` | List the supported documents in a directory |
//! | `docindex normalize <file>` | Print the normalized text of one document |
//! | `docindex ingest <path>` | Chunk a file or directory into the collection |
//! | `docindex chunks <source>` | Print the stored chunks of one document |
//! | `docindex stats` | Summarize the collection |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docindex::config;
use docindex::connector_fs::scan_directory;
use docindex::core::normalize;
use docindex::extract::ReaderRegistry;
use docindex::ingest;
use docindex::logging;
use docindex::progress::ProgressMode;
use docindex::sqlite_store::SqliteCollection;
use docindex::stats;

/// Normalize, chunk, and collect local documents.
///
/// Without `--config` the built-in defaults are used: 500-character chunks
/// with 100 characters of overlap, written to the `my_docs` collection in
/// `./data/docindex.sqlite`.
#[derive(Parser)]
#[command(
    name = "docindex",
    about = "Normalize, chunk, and collect local documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it more than once is safe.
    Init,

    /// List the supported documents directly inside a directory.
    Scan {
        /// Directory to scan (not recursive).
        dir: PathBuf,
    },

    /// Print the normalized text of one document.
    Normalize {
        /// A `.pdf`, `.txt`, `.md`, or `.csv` file.
        file: PathBuf,
    },

    /// Ingest a file or every supported file in a directory.
    ///
    /// Documents ingested before are replaced, not duplicated.
    Ingest {
        /// File or directory to ingest.
        path: PathBuf,

        /// Dry run: show document and chunk counts without writing.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Print the stored chunks of one document, in order.
    Chunks {
        /// Source identifier, as shown by `docindex stats`.
        source: String,
    },

    /// Show per-source chunk counts for the collection.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_default(cli.config.as_deref())?;
    logging::init_tracing(&cfg.logging);

    match cli.command {
        Commands::Init => {
            let collection = SqliteCollection::open(&cfg).await?;
            collection.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Scan { dir } => {
            for path in scan_directory(&dir)? {
                println!("{}", path.display());
            }
        }
        Commands::Normalize { file } => {
            let raw = ReaderRegistry::with_defaults().read_document(&file)?;
            println!("{}", normalize(&raw));
        }
        Commands::Ingest {
            path,
            dry_run,
            progress,
        } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            let reporter = mode.reporter();
            ingest::run_ingest(&cfg, &path, dry_run, reporter.as_ref()).await?;
        }
        Commands::Chunks { source } => {
            stats::run_chunks(&cfg, &source).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
