//! Tests for the info CLI command

use crate::cli::test_helpers::{create_cli_test_services, setup_indexed_corpus};
use pubmed_ir::cli::commands::info::{execute, InfoArgs};
use pubmed_ir::cli::OutputFormat;
use pubmed_ir::core::config::{Config, StemLanguage};
use pubmed_ir::core::services::Services;
use std::sync::Arc;

#[test]
fn test_info_human_and_json() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let human = execute(
        InfoArgs {
            index_path: index_path.clone(),
        },
        &services,
        OutputFormat::Human,
    );
    assert!(human.is_ok(), "Info should succeed: {:?}", human.err());

    let json = execute(InfoArgs { index_path }, &services, OutputFormat::Json);
    assert!(json.is_ok(), "JSON info should succeed: {:?}", json.err());
}

#[test]
fn test_info_with_different_configured_analyzer() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let mut config = Config::default();
    config.analyzer.language = StemLanguage::German;
    let german = Arc::new(Services::new(config));

    let result = execute(InfoArgs { index_path }, &german, OutputFormat::Human);
    assert!(result.is_ok(), "Info should use the index analyzer: {:?}", result.err());
}

#[test]
fn test_info_missing_index() {
    let services = create_cli_test_services();
    let temp = tempfile::TempDir::new().unwrap();

    let result = execute(
        InfoArgs {
            index_path: temp.path().join("missing"),
        },
        &services,
        OutputFormat::Json,
    );
    assert!(result.is_err());
}
