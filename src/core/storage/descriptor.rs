//! Index descriptor (`descriptor.json`).
//!
//! Records the field kinds and analyzer an index was built with, plus
//! document and commit counters. It is rewritten after every commit.

use crate::core::config::AnalyzerConfig;
use crate::core::error::Result;
use crate::core::storage::schema::{field_kinds, FieldKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current descriptor format
/// Version 1: field kinds, analyzer, counters
pub const FORMAT_VERSION: u32 = 1;

pub const DESCRIPTOR_FILE: &str = "descriptor.json";
pub const TANTIVY_DIR: &str = "tantivy";

/// Descriptor stored next to the tantivy directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub format_version: u32,
    pub fields: BTreeMap<String, FieldKind>,
    pub analyzer: AnalyzerConfig,
    pub created_at: DateTime<Utc>,
    pub last_commit_at: Option<DateTime<Utc>>,
    pub documents: u64,
    pub commits: u64,
    pub segments: usize,
}

impl IndexDescriptor {
    pub fn new(analyzer: AnalyzerConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            fields: field_kinds(),
            analyzer,
            created_at: Utc::now(),
            last_commit_at: None,
            documents: 0,
            commits: 0,
            segments: 0,
        }
    }

    pub fn path(index_path: &Path) -> PathBuf {
        index_path.join(DESCRIPTOR_FILE)
    }

    pub fn tantivy_dir(index_path: &Path) -> PathBuf {
        index_path.join(TANTIVY_DIR)
    }

    pub fn load(index_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(Self::path(index_path))?;
        let descriptor: IndexDescriptor = serde_json::from_str(&contents)?;
        Ok(descriptor)
    }

    /// Write the descriptor atomically (temp file + rename)
    pub fn save(&self, index_path: &Path) -> Result<()> {
        let target = Self::path(index_path);
        let tmp = index_path.join(format!("{DESCRIPTOR_FILE}.tmp"));

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &target)?;

        Ok(())
    }

    /// Describe why the descriptor's layout differs from the current one
    pub fn layout_difference(&self) -> Option<String> {
        if self.format_version != FORMAT_VERSION {
            return Some(format!(
                "descriptor format v{} (current: v{FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.fields != field_kinds() {
            return Some(format!(
                "field kinds {:?} do not match expected {:?}",
                self.fields,
                field_kinds()
            ));
        }
        None
    }

    pub(crate) fn record_commit(&mut self, documents: u64, segments: usize) {
        self.documents = documents;
        self.segments = segments;
        self.commits += 1;
        self.last_commit_at = Some(Utc::now());
    }
}
