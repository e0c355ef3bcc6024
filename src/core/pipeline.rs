//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow:
//! 1. List shards of the corpus directory
//! 2. Create or re-open the index
//! 3. Stream records from the shards into the index
//! 4. Aggregate shard and record failures into a report

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::config::Config;
use crate::core::corpus::CorpusReader;
use crate::core::error::Result;
use crate::core::storage::{IndexStore, StoreConfig};
use crate::core::types::{IngestStats, ShardReport};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub corpus_dir: PathBuf,
    pub index_path: PathBuf,
    pub started_at: DateTime<Utc>,

    /// Shards found in the corpus directory
    pub shard_count: usize,

    /// Per-shard outcomes, in ingestion order
    pub shards: Vec<ShardReport>,

    /// Records extracted from the corpus
    pub records_read: u64,

    /// Corpus-level errors (unopenable shards, malformed fragments)
    pub corpus_errors: u64,

    /// What the index store did with the records
    pub stats: IngestStats,

    /// Documents in the index after the run
    pub documents: u64,

    pub duration_secs: f64,
}

impl IngestReport {
    /// Shards that ended with an error
    pub fn failed_shards(&self) -> impl Iterator<Item = &ShardReport> {
        self.shards.iter().filter(|s| s.error.is_some())
    }

    /// Shards that could not be opened
    pub fn unopened_shards(&self) -> impl Iterator<Item = &ShardReport> {
        self.shards.iter().filter(|s| s.open_failed())
    }

    /// Every shard opened and no record was rejected.
    ///
    /// Malformed fragments, including a truncated tail, do not count as
    /// failures; they show up in `corpus_errors` and `failed_shards`.
    pub fn is_success(&self) -> bool {
        self.unopened_shards().next().is_none() && self.stats.rejected == 0
    }
}

/// Drives corpus records into an index
pub struct IngestionPipeline {
    corpus: CorpusReader,
    store_config: StoreConfig,
    progress_interval: u64,
}

impl IngestionPipeline {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            corpus: CorpusReader::new(&config.corpus)?,
            store_config: StoreConfig::from(config),
            progress_interval: config.corpus.progress_interval.max(1),
        })
    }

    /// Replace the store settings (e.g. a command-line commit threshold)
    pub fn with_store_config(mut self, store_config: StoreConfig) -> Self {
        self.store_config = store_config;
        self
    }

    pub fn store_config(&self) -> &StoreConfig {
        &self.store_config
    }

    /// Index every shard of `corpus_dir` into `index_path`.
    ///
    /// The corpus directory is listed before the index is touched, so a
    /// bad corpus path never wipes an existing index.
    pub fn run(&self, corpus_dir: &Path, index_path: &Path, overwrite: bool) -> Result<IngestReport> {
        let start = Instant::now();
        let started_at = Utc::now();

        let mut corpus = self.corpus.records(corpus_dir)?;
        let shard_count = corpus.shard_count();

        let mut handle = IndexStore::create(index_path, &self.store_config, overwrite)?;
        tracing::info!(
            "Indexing {} shards from {:?} into {:?}",
            shard_count,
            corpus_dir,
            index_path
        );

        let mut records_read = 0u64;
        let mut corpus_errors = 0u64;
        let interval = self.progress_interval;
        let records = corpus.by_ref().filter_map(|item| match item {
            Ok(record) => {
                records_read += 1;
                if records_read % interval == 0 {
                    tracing::info!("Progress: {} records read", records_read);
                }
                Some(record)
            }
            Err(e) => {
                corpus_errors += 1;
                tracing::debug!("Corpus error: {}", e);
                None
            }
        });

        let stats = match handle.ingest(records) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(close_err) = handle.close() {
                    tracing::warn!("Failed to close index after error: {}", close_err);
                }
                return Err(e);
            }
        };

        let documents = handle.stats()?.documents;
        handle.close()?;

        let report = IngestReport {
            corpus_dir: corpus_dir.to_path_buf(),
            index_path: index_path.to_path_buf(),
            started_at,
            shard_count,
            shards: corpus.into_reports(),
            records_read,
            corpus_errors,
            stats,
            documents,
            duration_secs: start.elapsed().as_secs_f64(),
        };

        tracing::info!(
            "Indexing complete: {} records read, {} ingested, {} rejected, {} documents in {:.2}s",
            report.records_read,
            report.stats.ingested,
            report.stats.rejected,
            report.documents,
            report.duration_secs
        );
        for shard in report.failed_shards() {
            tracing::warn!(
                "Shard {:?} failed: {}",
                shard.path,
                shard.error.as_deref().unwrap_or("")
            );
        }

        Ok(report)
    }
}
