//! Corpus reader for compressed PubMed XML shards.
//!
//! # Architecture
//!
//! - **ShardWalker**: lists `pubmed*.xml.gz` files of a directory
//! - **ShardReader**: streams records out of one shard
//! - **CorpusReader** / **Corpus**: chains shards into one sequence
//!   and reports per-shard outcomes

mod fragment;
mod reader;
mod shard;
mod walker;

pub use reader::{Corpus, CorpusReader};
pub use shard::ShardReader;
pub use walker::ShardWalker;
