//! Tests for the delete CLI command

use crate::cli::test_helpers::{create_cli_test_services, setup_indexed_corpus};
use pubmed_ir::cli::commands::delete::{execute, DeleteArgs};
use pubmed_ir::cli::OutputFormat;

#[test]
fn test_delete_with_yes() {
    let services = create_cli_test_services();
    let (_out, index_path) = setup_indexed_corpus(&services);

    let result = execute(
        DeleteArgs {
            index_path: index_path.clone(),
            yes: true,
        },
        &services,
        OutputFormat::Json,
    );
    assert!(result.is_ok(), "Delete should succeed: {:?}", result.err());
    assert!(!index_path.exists());
}

#[test]
fn test_delete_missing_index() {
    let services = create_cli_test_services();
    let temp = tempfile::TempDir::new().unwrap();

    let result = execute(
        DeleteArgs {
            index_path: temp.path().join("missing"),
            yes: true,
        },
        &services,
        OutputFormat::Human,
    );
    assert!(result.is_err());
}

#[test]
fn test_delete_refuses_non_index_directory() {
    let services = create_cli_test_services();
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("documents");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("thesis.tex"), "\\documentclass{article}").unwrap();

    let result = execute(
        DeleteArgs {
            index_path: dir.clone(),
            yes: true,
        },
        &services,
        OutputFormat::Human,
    );
    assert!(result.is_err());
    assert!(dir.join("thesis.tex").exists());
}
