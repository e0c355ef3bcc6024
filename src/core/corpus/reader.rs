//! Corpus-level record stream.
//!
//! Chains the shards of a corpus directory into one lazy sequence and
//! keeps a report per shard.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::core::config::CorpusConfig;
use crate::core::corpus::{ShardReader, ShardWalker};
use crate::core::error::Result;
use crate::core::types::{Record, ShardReport};

/// Opens corpora according to the corpus configuration
#[derive(Debug, Clone)]
pub struct CorpusReader {
    walker: ShardWalker,
    continue_on_shard_error: bool,
}

impl CorpusReader {
    pub fn new(config: &CorpusConfig) -> Result<Self> {
        Ok(Self {
            walker: ShardWalker::new(&config.shard_prefix, &config.shard_suffix)?,
            continue_on_shard_error: config.continue_on_shard_error,
        })
    }

    /// Enumerate the shards of `dir` and chain them into one sequence.
    ///
    /// Fails only when the directory itself cannot be listed; shard
    /// failures surface as items of the returned sequence.
    pub fn records(&self, dir: &Path) -> Result<Corpus> {
        let shards = self.walker.collect_shards(dir)?;
        tracing::info!("Found {} shards in {:?}", shards.len(), dir);
        Ok(Corpus::new(shards, self.continue_on_shard_error))
    }
}

/// Lazy record sequence over many shards
#[derive(Debug)]
pub struct Corpus {
    pending: VecDeque<PathBuf>,
    current: Option<ShardReader>,
    reports: Vec<ShardReport>,
    total_shards: usize,
    continue_on_shard_error: bool,
    stopped: bool,
}

impl Corpus {
    pub fn new(shards: Vec<PathBuf>, continue_on_shard_error: bool) -> Self {
        Self {
            total_shards: shards.len(),
            pending: shards.into(),
            current: None,
            reports: Vec::new(),
            continue_on_shard_error,
            stopped: false,
        }
    }

    /// Number of shards found in the corpus directory
    pub fn shard_count(&self) -> usize {
        self.total_shards
    }

    /// Reports of the shards fully consumed so far
    pub fn reports(&self) -> &[ShardReport] {
        &self.reports
    }

    /// Reports of every shard touched, including a partially read one
    pub fn into_reports(mut self) -> Vec<ShardReport> {
        if let Some(reader) = self.current.take() {
            self.reports.push(reader.into_report());
        }
        self.reports
    }

    fn finish_current(&mut self) -> Option<ShardReport> {
        let report = self.current.take()?.into_report();
        self.reports.push(report.clone());
        Some(report)
    }
}

impl Iterator for Corpus {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stopped {
                return None;
            }

            if let Some(reader) = self.current.as_mut() {
                match reader.next() {
                    Some(item) => return Some(item),
                    None => {
                        let report = self.finish_current()?;
                        if report.error.is_none() && report.records + report.skipped == 0 {
                            tracing::info!(
                                "Shard {:?} holds no articles, stopping corpus",
                                report.path
                            );
                            self.stopped = true;
                            return None;
                        }
                        if report.error.is_some() && !self.continue_on_shard_error {
                            self.stopped = true;
                            return None;
                        }
                        continue;
                    }
                }
            }

            let path = self.pending.pop_front()?;
            match ShardReader::open(&path) {
                Ok(reader) => {
                    tracing::info!("Reading shard {:?}", path);
                    self.current = Some(reader);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    let mut report = ShardReport::new(&path);
                    report.error = Some(e.to_string());
                    self.reports.push(report);
                    if !self.continue_on_shard_error {
                        self.stopped = true;
                    }
                    return Some(Err(e));
                }
            }
        }
    }
}
