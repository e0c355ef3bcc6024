//! Configuration management for pubmed-ir.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{IrError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name looked up in the working directory when no config is given
pub const LOCAL_CONFIG_FILE: &str = "pubmed-ir.toml";

/// Smallest writer heap tantivy accepts (15 MB)
pub const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Shard discovery and reading
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Shard file names must start with this
    #[serde(default = "default_shard_prefix")]
    pub shard_prefix: String,

    /// Shard file names must end with this
    #[serde(default = "default_shard_suffix")]
    pub shard_suffix: String,

    /// Keep going with the next shard when one fails
    #[serde(default = "default_true")]
    pub continue_on_shard_error: bool,

    /// Log progress every N records
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

/// Index writer behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Pending writes that trigger an intermediate commit
    #[serde(default = "default_commit_threshold")]
    pub commit_threshold: u64,

    /// Memory budget handed to the tantivy writer
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,

    /// Merge all segments into one on the final commit
    #[serde(default = "default_true")]
    pub compact_on_finish: bool,

    /// Largest document count a compacted segment may hold
    #[serde(default = "default_max_compacted_docs")]
    pub max_compacted_docs: u64,
}

/// Text analysis shared by ingest and query time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub language: StemLanguage,

    /// Tokens shorter than this (in characters) are dropped
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,

    /// Tokens longer than this (in bytes) are dropped
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,

    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query string length in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// Stemmer language for the analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum StemLanguage {
    Arabic,
    Danish,
    Dutch,
    #[default]
    English,
    Finnish,
    French,
    German,
    Greek,
    Hungarian,
    Italian,
    Norwegian,
    Portuguese,
    Romanian,
    Russian,
    Spanish,
    Swedish,
    Tamil,
    Turkish,
}

impl StemLanguage {
    pub const ALL: [StemLanguage; 18] = [
        StemLanguage::Arabic,
        StemLanguage::Danish,
        StemLanguage::Dutch,
        StemLanguage::English,
        StemLanguage::Finnish,
        StemLanguage::French,
        StemLanguage::German,
        StemLanguage::Greek,
        StemLanguage::Hungarian,
        StemLanguage::Italian,
        StemLanguage::Norwegian,
        StemLanguage::Portuguese,
        StemLanguage::Romanian,
        StemLanguage::Russian,
        StemLanguage::Spanish,
        StemLanguage::Swedish,
        StemLanguage::Tamil,
        StemLanguage::Turkish,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StemLanguage::Arabic => "Arabic",
            StemLanguage::Danish => "Danish",
            StemLanguage::Dutch => "Dutch",
            StemLanguage::English => "English",
            StemLanguage::Finnish => "Finnish",
            StemLanguage::French => "French",
            StemLanguage::German => "German",
            StemLanguage::Greek => "Greek",
            StemLanguage::Hungarian => "Hungarian",
            StemLanguage::Italian => "Italian",
            StemLanguage::Norwegian => "Norwegian",
            StemLanguage::Portuguese => "Portuguese",
            StemLanguage::Romanian => "Romanian",
            StemLanguage::Russian => "Russian",
            StemLanguage::Spanish => "Spanish",
            StemLanguage::Swedish => "Swedish",
            StemLanguage::Tamil => "Tamil",
            StemLanguage::Turkish => "Turkish",
        }
    }
}

impl fmt::Display for StemLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StemLanguage {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self> {
        StemLanguage::ALL
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IrError::ConfigError(format!("Unknown stemmer language: {s}")))
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_shard_prefix() -> String {
    "pubmed".to_string()
}

fn default_shard_suffix() -> String {
    ".xml.gz".to_string()
}

fn default_progress_interval() -> u64 {
    100_000
}

/// 276 baseline shards of roughly 30,000 articles each
fn default_commit_threshold() -> u64 {
    8_280_000
}

fn default_writer_heap_bytes() -> usize {
    50_000_000
}

fn default_max_compacted_docs() -> u64 {
    4_000_000_000
}

fn default_min_token_length() -> usize {
    2
}

fn default_max_token_length() -> usize {
    40
}

fn default_stop_words() -> Vec<String> {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "can", "for", "from", "have", "if", "in",
        "is", "it", "may", "not", "of", "on", "or", "tbd", "that", "the", "this", "to", "us",
        "we", "when", "will", "with", "yet", "you", "your",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn default_k() -> usize {
    10
}

fn default_max_k() -> usize {
    1000
}

fn default_max_query_length() -> usize {
    1000
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            shard_prefix: default_shard_prefix(),
            shard_suffix: default_shard_suffix(),
            continue_on_shard_error: true,
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            commit_threshold: default_commit_threshold(),
            writer_heap_bytes: default_writer_heap_bytes(),
            compact_on_finish: true,
            max_compacted_docs: default_max_compacted_docs(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            language: StemLanguage::default(),
            min_token_length: default_min_token_length(),
            max_token_length: default_max_token_length(),
            stop_words: default_stop_words(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            IrError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// The TOML file is picked in this order:
    /// 1. `explicit` (the `--config` flag)
    /// 2. `PUBMED_IR_CONFIG` env var
    /// 3. `./pubmed-ir.toml`
    /// 4. none, defaults only
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::config_path(explicit) {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var("PUBMED_IR_CONFIG") {
            return Some(PathBuf::from(path));
        }
        let local = Path::new(LOCAL_CONFIG_FILE);
        local.exists().then(|| local.to_path_buf())
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Corpus configuration
        if let Ok(prefix) = env::var("PUBMED_IR_SHARD_PREFIX") {
            self.corpus.shard_prefix = prefix;
        }
        if let Ok(suffix) = env::var("PUBMED_IR_SHARD_SUFFIX") {
            self.corpus.shard_suffix = suffix;
        }
        if let Ok(interval) = env::var("PUBMED_IR_PROGRESS_INTERVAL") {
            if let Ok(n) = interval.parse() {
                self.corpus.progress_interval = n;
            }
        }

        // Index configuration
        if let Ok(threshold) = env::var("PUBMED_IR_COMMIT_THRESHOLD") {
            if let Ok(n) = threshold.parse() {
                self.index.commit_threshold = n;
            }
        }
        if let Ok(heap) = env::var("PUBMED_IR_WRITER_HEAP_BYTES") {
            if let Ok(n) = heap.parse() {
                self.index.writer_heap_bytes = n;
            }
        }
        if let Ok(compact) = env::var("PUBMED_IR_COMPACT_ON_FINISH") {
            if let Ok(b) = compact.parse() {
                self.index.compact_on_finish = b;
            }
        }

        // Analyzer configuration
        if let Ok(language) = env::var("PUBMED_IR_LANGUAGE") {
            match language.parse() {
                Ok(lang) => self.analyzer.language = lang,
                Err(e) => tracing::warn!("Ignoring PUBMED_IR_LANGUAGE: {e}"),
            }
        }

        // Search configuration
        if let Ok(default_k) = env::var("PUBMED_IR_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("PUBMED_IR_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.search.max_k = k;
            }
        }
        if let Ok(max_query_len) = env::var("PUBMED_IR_MAX_QUERY_LENGTH") {
            if let Ok(len) = max_query_len.parse() {
                self.search.max_query_length = len;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.corpus.shard_suffix.is_empty() {
            return Err(IrError::ConfigError(
                "Shard suffix must not be empty".to_string(),
            ));
        }

        if self.corpus.progress_interval == 0 {
            return Err(IrError::ConfigError(
                "Progress interval must be non-zero".to_string(),
            ));
        }

        if self.index.commit_threshold == 0 {
            return Err(IrError::ConfigError(
                "Commit threshold must be non-zero".to_string(),
            ));
        }

        if self.index.writer_heap_bytes < MIN_WRITER_HEAP_BYTES {
            return Err(IrError::ConfigError(format!(
                "Writer heap must be at least {MIN_WRITER_HEAP_BYTES} bytes"
            )));
        }

        if self.index.max_compacted_docs == 0 {
            return Err(IrError::ConfigError(
                "Max compacted docs must be non-zero".to_string(),
            ));
        }

        if self.analyzer.max_token_length == 0 {
            return Err(IrError::ConfigError(
                "Max token length must be non-zero".to_string(),
            ));
        }

        if self.analyzer.min_token_length > self.analyzer.max_token_length {
            return Err(IrError::ConfigError(
                "Min token length cannot exceed max token length".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(IrError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(IrError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(IrError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Shard pattern: {}*{}",
            self.corpus.shard_prefix,
            self.corpus.shard_suffix
        );
        tracing::info!(
            "  Continue on shard error: {}",
            self.corpus.continue_on_shard_error
        );
        tracing::info!("  Commit threshold: {}", self.index.commit_threshold);
        tracing::info!("  Writer heap: {} bytes", self.index.writer_heap_bytes);
        tracing::info!("  Compact on finish: {}", self.index.compact_on_finish);
        tracing::info!(
            "  Analyzer: {} stemmer, {} stop words, token length {}..={}",
            self.analyzer.language,
            self.analyzer.stop_words.len(),
            self.analyzer.min_token_length,
            self.analyzer.max_token_length
        );
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
    }
}
