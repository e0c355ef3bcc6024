//! pubmed-ir - Command-line interface for PubMed indexing and search
//!
//! # Examples
//!
//! ```bash
//! # Index a directory of shards
//! pubmed-ir index /data/pubmed /data/pubmed-index
//!
//! # Search abstracts
//! pubmed-ir search "insulin resistance" /data/pubmed-index -k 20
//!
//! # Export results for QA tooling
//! pubmed-ir --format xml search "sepsis biomarkers" /data/pubmed-index
//!
//! # Show index statistics
//! pubmed-ir info /data/pubmed-index
//! ```

use clap::Parser;
use pubmed_ir::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to stderr so stdout only carries command output
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
