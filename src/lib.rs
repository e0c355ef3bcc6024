//! pubmed-ir - streaming PubMed indexer with BM25 search
//!
//! Ingests compressed PubMed XML shards (`pubmed*.xml.gz`) into a
//! persistent Tantivy index and answers ranked free-text queries over
//! article abstracts.
//!
//! # Architecture
//!
//! The codebase is organized into two modules:
//!
//! - **core**: Domain logic
//!   - config, error, types
//!   - corpus (shard walking, streaming XML extraction)
//!   - storage (index store, schema, analyzer, descriptor)
//!   - search (BM25 queries)
//!   - pipeline (corpus to index)
//!   - export (XML result format)
//!   - services (unified service container)
//!
//! - **cli**: clap adapter (depends on core)
//!
//! # Key Features
//!
//! - Constant-memory streaming over gzip-compressed XML
//! - Batched commits with best-effort final compaction
//! - Schema and analyzer recorded on disk and checked on open
//! - Deterministic ranking (score, then insertion order)

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{IrError, Result};
pub use core::pipeline::{IngestReport, IngestionPipeline};
pub use core::search::SearchEngine;
pub use core::services::Services;
pub use core::storage::{IndexHandle, IndexStore, StoreConfig};
pub use core::types::*;
