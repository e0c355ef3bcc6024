//! CLI adapter for pubmed-ir
//!
//! Provides the command-line interface for indexing PubMed shards and
//! searching the resulting index. Depends on `core/`; nothing in
//! `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//! +------------------+      +------------------+
//! |      cli/        | ---> |     core/        |
//! | (clap adapter)   |      |  (domain logic)  |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pubmed-ir - PubMed abstract indexing and BM25 search
///
/// Indexes directories of `pubmed*.xml.gz` shards into a local Tantivy
/// index and answers ranked free-text queries over article abstracts.
#[derive(Parser, Debug)]
#[command(name = "pubmed-ir")]
#[command(version)]
#[command(about = "PubMed shard indexer with BM25 search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides PUBMED_IR_CONFIG and ./pubmed-ir.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => match &self.command {
                Commands::Index(args) if args.quiet => "pubmed_ir=warn",
                _ => "pubmed_ir=info",
            },
            1 => "pubmed_ir=debug",
            _ => "pubmed_ir=trace",
        }
    }
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
    /// XML in the QA `<IR><Result>` layout (search only; other commands emit JSON)
    Xml,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory of pubmed*.xml.gz shards
    Index(commands::IndexArgs),

    /// Search abstracts with BM25 ranking
    Search(commands::SearchArgs),

    /// Show index descriptor and statistics
    Info(commands::InfoArgs),

    /// Delete an index
    Delete(commands::DeleteArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  pubmed-ir completions bash > ~/.local/share/bash-completion/completions/pubmed-ir
    ///   zsh:   pubmed-ir completions zsh > ~/.zfunc/_pubmed-ir
    ///   fish:  pubmed-ir completions fish > ~/.config/fish/completions/pubmed-ir.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Config::load(cli.config.as_deref())?;
    if cli.verbose > 0 {
        config.log_config();
    }

    let services = Arc::new(Services::new(config));

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format),
        Commands::Search(args) => commands::search::execute(args, &services, cli.format),
        Commands::Info(args) => commands::info::execute(args, &services, cli.format),
        Commands::Delete(args) => commands::delete::execute(args, &services, cli.format),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
