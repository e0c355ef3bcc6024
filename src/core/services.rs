//! Unified service container for pubmed-ir
//!
//! Provides shared access to configuration, the search engine and
//! index handles.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::pipeline::IngestionPipeline;
use crate::core::search::SearchEngine;
use crate::core::storage::{IndexHandle, IndexStore, StoreConfig};
use std::path::Path;
use std::sync::Arc;

/// Unified services container
///
/// All CLI commands use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Search engine for BM25 queries
    pub search: Arc<SearchEngine>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let search = Arc::new(SearchEngine::new(&config.search));

        Self {
            search,
            config: Arc::new(config),
        }
    }

    /// Store settings derived from the configuration
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::from(self.config.as_ref())
    }

    /// Open an index read-only with the configured analyzer
    pub fn open_index(&self, path: &Path) -> Result<IndexHandle> {
        IndexStore::open(path, &self.store_config())
    }

    /// Create an ingestion pipeline from the configuration
    pub fn create_pipeline(&self) -> Result<IngestionPipeline> {
        IngestionPipeline::new(&self.config)
    }
}
