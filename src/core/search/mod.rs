//! Search module for BM25 free-text queries.
//!
//! This module analyzes free text with the index's own analyzer and
//! ranks abstracts with Tantivy's BM25 scoring.

mod engine;

pub use engine::{SearchEngine, SearchResponse};
