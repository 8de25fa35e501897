//! # docindex
//!
//! A local document ingestion pipeline: PDF, text, Markdown, and CSV files
//! are read, normalized, split into overlapping chunks, and written to a
//! named collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────────────┐   ┌────────────┐
//! │   Readers   │──▶│        Pipeline          │──▶│ Collection │
//! │ pdf/txt/... │   │ normalize→split→assemble │   │  (SQLite)  │
//! └─────────────┘   └──────────────────────────┘   └────────────┘
//! ```
//!
//! The pure text stages (normalization, splitting, chunk assembly) live in
//! the `docindex-core` crate and are re-exported here as [`core`].
//!
//! ## Quick Start
//!
//! ```bash
//! docindex init                 # create database
//! docindex ingest ./docs        # ingest a directory
//! docindex stats                # what the collection holds
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector_fs`] | Directory scanning |
//! | [`extract`] | Per-format readers and their registry |
//! | [`ingest`] | Pipeline orchestration |
//! | [`sqlite_store`] | SQLite collection sink |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`progress`] | Ingest progress reporting |
//! | [`stats`] | Collection summaries |
//! | [`logging`] | `tracing` subscriber setup |

pub use docindex_core as core;

pub mod config;
pub mod connector_fs;
pub mod db;
pub mod extract;
pub mod ingest;
pub mod logging;
pub mod migrate;
pub mod progress;
pub mod sqlite_store;
pub mod stats;
