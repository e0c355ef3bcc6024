//! Tests for argument parsing

use clap::Parser;
use pubmed_ir::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_parse_index_with_options() {
    let cli = Cli::try_parse_from([
        "pubmed-ir",
        "index",
        "/data/corpus",
        "/data/index",
        "--append",
        "--commit-threshold",
        "5000",
        "--no-compact",
    ])
    .unwrap();

    match cli.command {
        Commands::Index(args) => {
            assert_eq!(args.corpus_dir.to_str(), Some("/data/corpus"));
            assert_eq!(args.index_path.to_str(), Some("/data/index"));
            assert!(args.append);
            assert_eq!(args.commit_threshold, Some(5000));
            assert!(args.no_compact);
            assert!(!args.quiet);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_zero_commit_threshold_is_rejected() {
    let result = Cli::try_parse_from([
        "pubmed-ir",
        "index",
        "corpus",
        "index",
        "--commit-threshold",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_search_with_global_format() {
    let cli = Cli::try_parse_from([
        "pubmed-ir",
        "search",
        "heart failure",
        "/data/index",
        "-k",
        "25",
        "--format",
        "xml",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Xml);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.query, "heart failure");
            assert_eq!(args.limit, Some(25));
            assert!(!args.ids_only);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_search_requires_index_path() {
    assert!(Cli::try_parse_from(["pubmed-ir", "search", "query"]).is_err());
}

#[test]
fn test_default_log_filter() {
    let cli = Cli::try_parse_from(["pubmed-ir", "info", "idx"]).unwrap();
    assert_eq!(cli.default_log_filter(), "pubmed_ir=info");

    let cli = Cli::try_parse_from(["pubmed-ir", "-v", "info", "idx"]).unwrap();
    assert_eq!(cli.default_log_filter(), "pubmed_ir=debug");

    let cli = Cli::try_parse_from(["pubmed-ir", "-vv", "info", "idx"]).unwrap();
    assert_eq!(cli.default_log_filter(), "pubmed_ir=trace");

    let cli = Cli::try_parse_from(["pubmed-ir", "index", "c", "i", "--quiet"]).unwrap();
    assert_eq!(cli.default_log_filter(), "pubmed_ir=warn");
}

#[test]
fn test_parse_delete_and_completions() {
    let cli = Cli::try_parse_from(["pubmed-ir", "delete", "idx", "--yes"]).unwrap();
    assert!(matches!(cli.command, Commands::Delete(ref args) if args.yes));

    let cli = Cli::try_parse_from(["pubmed-ir", "completions", "bash"]).unwrap();
    assert!(matches!(cli.command, Commands::Completions(_)));
}

#[test]
fn test_config_flag_is_global() {
    let cli =
        Cli::try_parse_from(["pubmed-ir", "info", "idx", "--config", "custom.toml"]).unwrap();
    assert_eq!(
        cli.config.as_deref().and_then(|p| p.to_str()),
        Some("custom.toml")
    );
}
