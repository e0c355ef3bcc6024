//! Error types and error handling for pubmed-ir.
//!
//! Errors fall into three groups. Record-level errors (a malformed
//! fragment, a schema violation) only cost the offending record.
//! Shard-level errors cost one shard. Structural errors (closed or
//! locked store, analyzer drift, storage failures) always reach the
//! caller because they put the integrity of the index at risk.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pubmed-ir operations
pub type Result<T> = std::result::Result<T, IrError>;

/// Main error type for pubmed-ir
#[derive(Error, Debug)]
pub enum IrError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Cannot read shard {}: {message}", .path.display())]
    ShardOpen { path: PathBuf, message: String },

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Index handle for {} is closed", .0.display())]
    StoreClosed(PathBuf),

    #[error("Index handle for {} is read-only", .0.display())]
    StoreReadOnly(PathBuf),

    #[error("Index at {} is locked by another writer", .0.display())]
    LockContention(PathBuf),

    #[error("Analyzer mismatch: index was built with {found}, query analyzer is {expected}")]
    AnalyzerMismatch { expected: String, found: String },

    #[error("Index not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl IrError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Errors that only cost a single record
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            IrError::MalformedRecord(_) | IrError::SchemaViolation(_)
        )
    }

    /// Errors that cost a whole shard
    pub fn is_shard_level(&self) -> bool {
        matches!(self, IrError::ShardOpen { .. })
    }

    /// Errors that signal an index-integrity risk and must never be swallowed
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IrError::StoreClosed(_)
                | IrError::StoreReadOnly(_)
                | IrError::LockContention(_)
                | IrError::AnalyzerMismatch { .. }
                | IrError::StorageError(_)
        )
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, IrError::IndexNotFound(_) | IrError::InvalidPath(_))
    }
}
