//! Info command - show index descriptor and statistics

use crate::cli::output::{
    colors, directory_size, format_bytes, format_relative_time, print_structured, print_warning,
};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::analyzer::describe;
use crate::core::storage::{IndexStore, StoreStats};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Directory of the index to inspect
    pub index_path: PathBuf,
}

/// Index information response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub format_version: u32,
    pub analyzer: String,
    pub analyzer_matches_config: bool,
    pub size_bytes: u64,
    pub fields: Vec<String>,
    pub stats: StoreStats,
}

/// Execute the info command
pub fn execute(
    args: InfoArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = IndexStore::descriptor(&args.index_path)?;

    // The index is opened with its own analyzer so a config change
    // never hides the statistics.
    let store_config = services
        .store_config()
        .with_analyzer(descriptor.analyzer.clone());
    let mut handle = IndexStore::open(&args.index_path, &store_config)?;
    let stats = handle.stats()?;
    handle.close()?;

    let info = InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        format_version: descriptor.format_version,
        analyzer: describe(&descriptor.analyzer),
        analyzer_matches_config: descriptor.analyzer == services.config.analyzer,
        size_bytes: directory_size(&args.index_path),
        fields: descriptor
            .fields
            .iter()
            .map(|(name, kind)| format!("{name}: {kind:?}"))
            .collect(),
        stats,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::label("Index:"),
                colors::file_path(&info.stats.path.display().to_string())
            );
            println!(
                "{} {}",
                colors::label("Documents:"),
                colors::number(&info.stats.documents.to_string())
            );
            println!(
                "{} {}",
                colors::label("Segments:"),
                colors::number(&info.stats.segments.to_string())
            );
            println!(
                "{} {}",
                colors::label("Commits:"),
                colors::number(&info.stats.commits.to_string())
            );
            println!(
                "{} {}",
                colors::label("Size:"),
                colors::number(&format_bytes(info.size_bytes))
            );
            println!("{} {}", colors::label("Analyzer:"), info.analyzer);
            println!(
                "{} {} {}",
                colors::label("Created:"),
                info.stats.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                colors::dim(&format!("({})", format_relative_time(&info.stats.created_at)))
            );
            match &info.stats.last_commit_at {
                Some(at) => println!(
                    "{} {} {}",
                    colors::label("Last commit:"),
                    at.format("%Y-%m-%d %H:%M:%S UTC"),
                    colors::dim(&format!("({})", format_relative_time(at)))
                ),
                None => println!("{} {}", colors::label("Last commit:"), colors::dim("never")),
            }
            println!("{} v{}", colors::label("Format:"), info.format_version);
            if !info.analyzer_matches_config {
                print_warning(
                    "the configured analyzer differs from this index; searches with the current configuration will fail",
                );
            }
        }
        OutputFormat::Json | OutputFormat::Xml => print_structured(&info, format)?,
    }

    Ok(())
}
