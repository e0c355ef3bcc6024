//! Tests for the search CLI command
//!
//! Tests the search command handler with various scenarios:
//! - Valid queries with results
//! - Empty results
//! - Missing index
//! - Output format variations

use crate::cli::test_helpers::{create_cli_test_services, setup_indexed_corpus};
use pubmed_ir::cli::commands::search::{execute, SearchArgs};
use pubmed_ir::cli::OutputFormat;
use std::path::PathBuf;

fn args(query: &str, index_path: PathBuf) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        index_path,
        limit: None,
        ids_only: false,
    }
}

#[test]
fn test_search_human() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let result = execute(args("influenza", index_path), &services, OutputFormat::Human);
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[test]
fn test_search_json_with_limit() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let mut search_args = args("influenza", index_path);
    search_args.limit = Some(1);
    let result = execute(search_args, &services, OutputFormat::Json);
    assert!(result.is_ok(), "JSON search should succeed: {:?}", result.err());
}

#[test]
fn test_search_xml() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let result = execute(args("zinc cold", index_path), &services, OutputFormat::Xml);
    assert!(result.is_ok(), "XML search should succeed: {:?}", result.err());
}

#[test]
fn test_search_ids_only() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let mut search_args = args("influenza", index_path);
    search_args.ids_only = true;
    assert!(execute(search_args, &services, OutputFormat::Human).is_ok());
}

#[test]
fn test_search_empty_results() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let result = execute(args("xylophone", index_path), &services, OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_search_missing_index() {
    let services = create_cli_test_services();
    let temp = tempfile::TempDir::new().unwrap();

    let result = execute(
        args("anything", temp.path().join("missing")),
        &services,
        OutputFormat::Human,
    );
    assert!(result.is_err());
}
