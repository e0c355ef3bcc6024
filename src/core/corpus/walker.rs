//! Shard discovery.
//!
//! Lists the shard files of a corpus directory by name pattern. The
//! listing is flat (no recursion) and sorted by file name so that
//! ingestion order is deterministic across runs.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::{IrError, Result};

/// Enumerates shard files of a corpus directory
#[derive(Debug, Clone)]
pub struct ShardWalker {
    /// `{prefix}*{suffix}` with both parts escaped
    pattern: Pattern,
}

impl ShardWalker {
    /// Create a walker matching `{prefix}*{suffix}` file names
    pub fn new(prefix: &str, suffix: &str) -> Result<Self> {
        let raw = format!("{}*{}", Pattern::escape(prefix), Pattern::escape(suffix));
        let pattern = Pattern::new(&raw).map_err(|e| {
            IrError::ConfigError(format!("Invalid shard pattern '{raw}': {e}"))
        })?;
        Ok(Self { pattern })
    }

    /// Collect all shard files directly inside `dir`, sorted by name
    pub fn collect_shards(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(IrError::InvalidPath(format!(
                "Corpus directory does not exist or is not a directory: {}",
                dir.display()
            )));
        }

        let mut shards = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let matches = entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| self.pattern.matches(name));
                    if matches {
                        shards.push(entry.into_path());
                    } else {
                        tracing::debug!("Ignoring non-shard file: {:?}", entry.path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        tracing::debug!("Found {} shards in {:?}", shards.len(), dir);
        Ok(shards)
    }

    /// Whether a bare file name looks like a shard
    pub fn is_shard_name(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }
}
