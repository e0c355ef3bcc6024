//! Search command - rank abstracts against a free-text query

use crate::cli::output::{colors, truncate_chars};
use crate::cli::OutputFormat;
use crate::core::export::hits_to_xml;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Characters of abstract shown per hit in human output
const ABSTRACT_PREVIEW_CHARS: usize = 240;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query, matched against abstracts
    pub query: String,

    /// Directory of the index to search
    pub index_path: PathBuf,

    /// Maximum number of results (defaults to search.default_k)
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Only show PMIDs
    #[arg(long)]
    pub ids_only: bool,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    pub pmid: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub index: String,
    pub terms: Vec<String>,
    pub total_results: usize,
    pub duration_ms: u64,
    pub results: Vec<SearchResultItem>,
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = args.limit.unwrap_or_else(|| services.search.default_k());

    let mut handle = services.open_index(&args.index_path)?;
    let response = services
        .search
        .search_response(&handle, &args.query, limit)?;
    handle.close()?;

    if format == OutputFormat::Xml {
        println!("{}", hits_to_xml(&response.hits)?);
        return Ok(());
    }

    let output = SearchResponseOutput {
        query: response.query.clone(),
        index: args.index_path.display().to_string(),
        terms: response.terms.clone(),
        total_results: response.count,
        duration_ms: response.duration_ms,
        results: response
            .hits
            .into_iter()
            .map(|hit| {
                let record = hit.record;
                if args.ids_only {
                    SearchResultItem {
                        rank: hit.rank,
                        pmid: record.id,
                        score: hit.score,
                        title: None,
                        journal: None,
                        year: None,
                        abstract_text: None,
                        topics: Vec::new(),
                    }
                } else {
                    SearchResultItem {
                        rank: hit.rank,
                        pmid: record.id,
                        score: hit.score,
                        title: Some(record.title),
                        journal: Some(record.journal),
                        year: record.year,
                        abstract_text: Some(record.abstract_text),
                        topics: record.topics,
                    }
                }
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => print_human(&output, args.ids_only),
        OutputFormat::Json | OutputFormat::Xml => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_human(output: &SearchResponseOutput, ids_only: bool) {
    if output.results.is_empty() {
        if !ids_only {
            println!(
                "No results found for '{}'",
                colors::label(&output.query)
            );
        }
        return;
    }

    if ids_only {
        for result in &output.results {
            println!("{}", result.pmid);
        }
        return;
    }

    println!(
        "Found {} result(s) in {}:\n",
        colors::number(&output.total_results.to_string()),
        colors::dim(&format!("{}ms", output.duration_ms))
    );

    for result in &output.results {
        let mut heading = format!(
            "[{}] {} {}",
            colors::rank(&result.rank.to_string()),
            colors::pmid(&result.pmid),
            colors::score(&format!("(score: {:.2})", result.score))
        );
        if let Some(title) = result.title.as_deref().filter(|t| !t.is_empty()) {
            heading.push(' ');
            heading.push_str(&colors::label(title).to_string());
        }
        println!("{heading}");

        let source: Vec<String> = result
            .journal
            .iter()
            .filter(|j| !j.is_empty())
            .cloned()
            .chain(result.year.map(|y| y.to_string()))
            .collect();
        if !source.is_empty() {
            println!("    {}", colors::dim(&source.join(", ")));
        }

        if let Some(text) = &result.abstract_text {
            println!(
                "    {}",
                truncate_chars(text, ABSTRACT_PREVIEW_CHARS)
            );
        }
        if !result.topics.is_empty() {
            println!("    {}", colors::dim(&format!("MeSH: {}", result.topics.join("; "))));
        }
        println!();
    }
}
