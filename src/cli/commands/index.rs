//! Index command - ingest a directory of PubMed shards

use crate::cli::output::{colors, format_duration, print_structured, print_warning};
use crate::cli::OutputFormat;
use crate::core::pipeline::IngestReport;
use crate::core::services::Services;
use crate::core::types::Rejection;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory holding pubmed*.xml.gz shards
    pub corpus_dir: PathBuf,

    /// Directory of the index to create
    pub index_path: PathBuf,

    /// Add to an existing compatible index instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Pending records that trigger an intermediate commit
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub commit_threshold: Option<u64>,

    /// Skip the final segment merge
    #[arg(long)]
    pub no_compact: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Shard that ended with an error
#[derive(Debug, Serialize)]
pub struct FailedShard {
    pub path: String,
    pub opened: bool,
    pub records: u64,
    pub error: String,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub corpus_dir: String,
    pub index_path: String,
    pub shards: usize,
    pub records_read: u64,
    pub records_ingested: u64,
    pub records_rejected: u64,
    pub corpus_errors: u64,
    pub documents: u64,
    pub intermediate_commits: u64,
    pub compacted: bool,
    pub duration_secs: f64,
    pub throughput_records_per_sec: f64,
    pub failed_shards: Vec<FailedShard>,
    pub rejections: Vec<Rejection>,
}

impl From<&IngestReport> for IndexResponse {
    fn from(report: &IngestReport) -> Self {
        let throughput = if report.duration_secs > 0.0 {
            report.stats.ingested as f64 / report.duration_secs
        } else {
            0.0
        };

        Self {
            corpus_dir: report.corpus_dir.display().to_string(),
            index_path: report.index_path.display().to_string(),
            shards: report.shard_count,
            records_read: report.records_read,
            records_ingested: report.stats.ingested,
            records_rejected: report.stats.rejected,
            corpus_errors: report.corpus_errors,
            documents: report.documents,
            intermediate_commits: report.stats.intermediate_commits,
            compacted: report.stats.compacted,
            duration_secs: report.duration_secs,
            throughput_records_per_sec: throughput,
            failed_shards: report
                .failed_shards()
                .map(|s| FailedShard {
                    path: s.path.display().to_string(),
                    opened: s.opened,
                    records: s.records,
                    error: s.error.clone().unwrap_or_default(),
                })
                .collect(),
            rejections: report.stats.rejections.clone(),
        }
    }
}

/// Execute the index command
pub fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.corpus_dir.is_dir() {
        return Err(format!(
            "Corpus directory '{}' does not exist or is not a directory.",
            args.corpus_dir.display()
        )
        .into());
    }

    let mut store_config = services.store_config();
    if let Some(threshold) = args.commit_threshold {
        store_config = store_config.with_commit_threshold(threshold);
    }
    if args.no_compact {
        store_config = store_config.with_compaction(false);
    }
    let pipeline = services.create_pipeline()?.with_store_config(store_config);

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}{}...",
            colors::file_path(&args.corpus_dir.display().to_string()),
            colors::file_path(&args.index_path.display().to_string()),
            if args.append { " (append)" } else { "" }
        );
    }

    let report = pipeline.run(&args.corpus_dir, &args.index_path, !args.append)?;
    let response = IndexResponse::from(&report);

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json | OutputFormat::Xml => print_structured(&response, format)?,
    }

    if !report.is_success() {
        return Err(format!(
            "Indexing finished with {} unreadable shard(s) and {} rejected record(s).",
            report.unopened_shards().count(),
            response.records_rejected
        )
        .into());
    }

    Ok(())
}

fn print_human(response: &IndexResponse) {
    println!(
        "{} {} records from {} shard(s) in {}",
        colors::success("Indexed"),
        colors::number(&response.records_ingested.to_string()),
        colors::number(&response.shards.to_string()),
        colors::number(&format_duration(response.duration_secs))
    );
    println!(
        "Documents: {}  Commits: {}  Compacted: {}",
        colors::number(&response.documents.to_string()),
        colors::number(&(response.intermediate_commits + 1).to_string()),
        if response.compacted { "yes" } else { "no" }
    );
    println!(
        "Throughput: {} records/sec",
        colors::number(&format!("{:.0}", response.throughput_records_per_sec))
    );

    if response.corpus_errors > 0 {
        print_warning(&format!(
            "{} malformed or unreadable fragment(s) skipped",
            response.corpus_errors
        ));
    }
    for shard in &response.failed_shards {
        let label = if shard.opened { "stopped" } else { "unreadable" };
        println!(
            "  {} {} {}",
            colors::error(label),
            colors::file_path(&shard.path),
            colors::dim(&shard.error)
        );
    }
    if response.records_rejected > 0 {
        print_warning(&format!(
            "{} record(s) rejected",
            response.records_rejected
        ));
        for rejection in &response.rejections {
            println!(
                "  {} {}",
                colors::pmid(&rejection.id),
                colors::dim(&rejection.reason)
            );
        }
    }
}
