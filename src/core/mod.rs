//! Core domain logic
//!
//! This module contains all indexing and search logic, independent of
//! the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Record model and reports
//! - **corpus**: Shard discovery and streaming XML extraction
//! - **storage**: Tantivy index store with batched commits
//! - **search**: BM25 query engine
//! - **pipeline**: Corpus-to-index ingestion
//! - **export**: XML rendering of results
//! - **services**: Unified service container

pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{IrError, Result};
pub use services::Services;
