//! Tests for the index CLI command

use crate::cli::test_helpers::{create_cli_test_services, sample_corpus};
use crate::common::CorpusDir;
use pubmed_ir::cli::commands::index::{execute, IndexArgs};
use pubmed_ir::cli::OutputFormat;
use pubmed_ir::core::storage::IndexStore;
use std::path::PathBuf;
use tempfile::TempDir;

fn args(corpus_dir: PathBuf, index_path: PathBuf) -> IndexArgs {
    IndexArgs {
        corpus_dir,
        index_path,
        append: false,
        commit_threshold: None,
        no_compact: false,
        quiet: true,
    }
}

#[test]
fn test_index_human() {
    let services = create_cli_test_services();
    let corpus = sample_corpus();
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index");

    let result = execute(
        args(corpus.path().to_path_buf(), index_path.clone()),
        &services,
        OutputFormat::Human,
    );
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    assert_eq!(IndexStore::descriptor(&index_path).unwrap().documents, 3);
}

#[test]
fn test_index_json_with_overrides() {
    let services = create_cli_test_services();
    let corpus = sample_corpus();
    let out = TempDir::new().unwrap();

    let mut index_args = args(corpus.path().to_path_buf(), out.path().join("index"));
    index_args.commit_threshold = Some(1);
    index_args.no_compact = true;

    let result = execute(index_args, &services, OutputFormat::Json);
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    assert!(IndexStore::descriptor(&out.path().join("index")).unwrap().segments >= 2);
}

#[test]
fn test_index_append() {
    let services = create_cli_test_services();
    let corpus = sample_corpus();
    let more = CorpusDir::new();
    more.add_shard(
        "pubmed03.xml.gz",
        &[crate::common::article("200", "Another abstract")],
    );
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index");

    execute(
        args(corpus.path().to_path_buf(), index_path.clone()),
        &services,
        OutputFormat::Json,
    )
    .unwrap();

    let mut append_args = args(more.path().to_path_buf(), index_path.clone());
    append_args.append = true;
    execute(append_args, &services, OutputFormat::Json).unwrap();

    assert_eq!(IndexStore::descriptor(&index_path).unwrap().documents, 4);
}

#[test]
fn test_index_missing_corpus_dir() {
    let services = create_cli_test_services();
    let out = TempDir::new().unwrap();

    let result = execute(
        args(out.path().join("missing"), out.path().join("index")),
        &services,
        OutputFormat::Human,
    );
    assert!(result.is_err());
    assert!(!out.path().join("index").exists());
}

#[test]
fn test_index_fails_when_a_shard_fails() {
    let services = create_cli_test_services();
    let corpus = sample_corpus();
    corpus.add_garbage_shard("pubmed03.xml.gz");
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index");

    let result = execute(
        args(corpus.path().to_path_buf(), index_path.clone()),
        &services,
        OutputFormat::Json,
    );
    assert!(result.is_err());

    // Records from good shards are still committed
    assert_eq!(IndexStore::descriptor(&index_path).unwrap().documents, 3);
}

#[test]
fn test_index_truncated_shard_still_succeeds() {
    let services = create_cli_test_services();
    let corpus = sample_corpus();
    let good = crate::common::article("300", "Complete abstract").to_xml();
    corpus.add_raw_shard(
        "pubmed03.xml.gz",
        &format!("<PubmedArticleSet>{good}<PubmedArticle><PMID>301</PMID><AbstractText>cut"),
    );
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index");

    let result = execute(
        args(corpus.path().to_path_buf(), index_path.clone()),
        &services,
        OutputFormat::Json,
    );
    assert!(result.is_ok(), "Truncated tail is not fatal: {:?}", result.err());
    assert_eq!(IndexStore::descriptor(&index_path).unwrap().documents, 4);
}
