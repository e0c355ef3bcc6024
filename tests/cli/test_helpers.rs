//! Shared helpers for CLI command tests

use crate::common::{article, CorpusDir};
use pubmed_ir::core::config::Config;
use pubmed_ir::core::services::Services;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Services with a small commit threshold
pub fn create_cli_test_services() -> Arc<Services> {
    let mut config = Config::default();
    config.index.commit_threshold = 100;
    config.index.compact_on_finish = false;
    Arc::new(Services::new(config))
}

/// Corpus with two well-formed shards
pub fn sample_corpus() -> CorpusDir {
    let corpus = CorpusDir::new();
    corpus.add_shard(
        "pubmed01.xml.gz",
        &[
            article("100", "Influenza vaccination in the elderly.")
                .title("Flu shots")
                .journal("Vaccine")
                .year(2015)
                .mesh("Influenza Vaccines"),
            article("101", "Hand hygiene reduces influenza transmission."),
        ],
    );
    corpus.add_shard(
        "pubmed02.xml.gz",
        &[article("102", "Zinc supplementation and the common cold.")],
    );
    corpus
}

/// Build an index from [`sample_corpus`], returning the scratch dir and index path
pub fn setup_indexed_corpus(services: &Arc<Services>) -> (TempDir, PathBuf) {
    let corpus = sample_corpus();
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index");
    services
        .create_pipeline()
        .unwrap()
        .run(corpus.path(), &index_path, true)
        .unwrap();
    (out, index_path)
}
