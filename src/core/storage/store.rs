//! Index store: lifecycle, batched commits and schema enforcement.
//!
//! `IndexStore` decides how a path is opened (fresh, re-entered, or
//! rejected) and hands out an `IndexHandle`. A writable handle owns the
//! tantivy writer lock for its whole session.

use crate::core::config::{AnalyzerConfig, Config};
use crate::core::error::{IrError, Result};
use crate::core::storage::analyzer::{build_analyzer, describe};
use crate::core::storage::descriptor::IndexDescriptor;
use crate::core::storage::schema::{
    build_schema, schema_difference, Fields, ANALYZER_NAME, MAX_TERM_BYTES,
};
use crate::core::types::{IngestStats, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tantivy::directory::error::LockError;
use tantivy::merge_policy::NoMergePolicy;
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, SegmentId, TantivyDocument,
    TantivyError,
};

/// Settings an index handle is created with
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Pending writes that trigger an intermediate commit
    pub commit_threshold: u64,
    pub writer_heap_bytes: usize,
    pub compact_on_finish: bool,
    pub max_compacted_docs: u64,
    pub analyzer: AnalyzerConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for StoreConfig {
    fn from(config: &Config) -> Self {
        Self {
            commit_threshold: config.index.commit_threshold,
            writer_heap_bytes: config.index.writer_heap_bytes,
            compact_on_finish: config.index.compact_on_finish,
            max_compacted_docs: config.index.max_compacted_docs,
            analyzer: config.analyzer.clone(),
        }
    }
}

impl StoreConfig {
    pub fn with_commit_threshold(mut self, threshold: u64) -> Self {
        self.commit_threshold = threshold;
        self
    }

    pub fn with_compaction(mut self, compact_on_finish: bool) -> Self {
        self.compact_on_finish = compact_on_finish;
        self
    }

    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }
}

/// What is found at an index path before any lock is taken
#[derive(Debug, Clone)]
pub enum IndexState {
    /// Nothing there (or an empty directory)
    Absent,
    /// An index with the expected layout and analyzer
    Compatible(IndexDescriptor),
    /// Something that is not an index with the expected layout
    SchemaMismatch(String),
    /// The expected layout, built with a different analyzer
    AnalyzerMismatch(IndexDescriptor),
}

/// Entry points for creating, opening and removing indexes
pub struct IndexStore;

impl IndexStore {
    /// Classify what is found at `path`
    pub fn inspect(path: &Path, analyzer: &AnalyzerConfig) -> Result<IndexState> {
        if !path.exists() {
            return Ok(IndexState::Absent);
        }
        if !path.is_dir() {
            return Ok(IndexState::SchemaMismatch(
                "path exists and is not a directory".to_string(),
            ));
        }

        let descriptor_path = IndexDescriptor::path(path);
        let tantivy_dir = IndexDescriptor::tantivy_dir(path);
        if !descriptor_path.exists() && !tantivy_dir.exists() {
            if fs::read_dir(path)?.next().is_none() {
                return Ok(IndexState::Absent);
            }
            return Ok(IndexState::SchemaMismatch(
                "directory exists but holds no index".to_string(),
            ));
        }

        let descriptor = match IndexDescriptor::load(path) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                return Ok(IndexState::SchemaMismatch(format!(
                    "unreadable descriptor: {e}"
                )))
            }
        };
        if let Some(diff) = descriptor.layout_difference() {
            return Ok(IndexState::SchemaMismatch(diff));
        }

        match Index::open_in_dir(&tantivy_dir) {
            Ok(index) => {
                if let Some(diff) = schema_difference(&index.schema()) {
                    return Ok(IndexState::SchemaMismatch(diff));
                }
            }
            Err(e) => {
                return Ok(IndexState::SchemaMismatch(format!(
                    "cannot open tantivy index: {e}"
                )))
            }
        }

        if descriptor.analyzer != *analyzer {
            return Ok(IndexState::AnalyzerMismatch(descriptor));
        }

        Ok(IndexState::Compatible(descriptor))
    }

    /// Create an index for writing, or re-enter a compatible one.
    ///
    /// With `overwrite`, any prior index at `path` is removed first.
    pub fn create(path: &Path, config: &StoreConfig, overwrite: bool) -> Result<IndexHandle> {
        if overwrite && path.exists() {
            tracing::info!("Removing existing index at {:?}", path);
            Self::destroy(path)?;
        }

        match Self::inspect(path, &config.analyzer)? {
            IndexState::Absent => Self::create_fresh(path, config),
            IndexState::Compatible(descriptor) => {
                tracing::info!(
                    "Re-opening existing index at {:?} ({} documents)",
                    path,
                    descriptor.documents
                );
                IndexHandle::load(path, config, descriptor, true)
            }
            IndexState::SchemaMismatch(reason) => Err(IrError::SchemaViolation(format!(
                "{}: {reason}",
                path.display()
            ))),
            IndexState::AnalyzerMismatch(descriptor) => Err(IrError::SchemaViolation(format!(
                "{}: index was built with analyzer ({}), requested ({})",
                path.display(),
                describe(&descriptor.analyzer),
                describe(&config.analyzer)
            ))),
        }
    }

    /// Open an existing index read-only, for queries
    pub fn open(path: &Path, config: &StoreConfig) -> Result<IndexHandle> {
        match Self::inspect(path, &config.analyzer)? {
            IndexState::Absent => Err(IrError::IndexNotFound(path.to_path_buf())),
            IndexState::Compatible(descriptor) => IndexHandle::load(path, config, descriptor, false),
            IndexState::SchemaMismatch(reason) => Err(IrError::SchemaViolation(format!(
                "{}: {reason}",
                path.display()
            ))),
            IndexState::AnalyzerMismatch(descriptor) => Err(IrError::AnalyzerMismatch {
                expected: describe(&config.analyzer),
                found: describe(&descriptor.analyzer),
            }),
        }
    }

    /// Remove an index directory
    pub fn destroy(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(IrError::IndexNotFound(path.to_path_buf()));
        }

        let looks_like_index = IndexDescriptor::path(path).exists()
            || IndexDescriptor::tantivy_dir(path).exists()
            || (path.is_dir() && fs::read_dir(path)?.next().is_none());
        if !path.is_dir() || !looks_like_index {
            return Err(IrError::InvalidPath(format!(
                "Refusing to delete {}: not an index directory",
                path.display()
            )));
        }

        fs::remove_dir_all(path)?;
        tracing::info!("Deleted index at {:?}", path);
        Ok(())
    }

    /// Read the descriptor of an existing index
    pub fn descriptor(path: &Path) -> Result<IndexDescriptor> {
        if !IndexDescriptor::path(path).exists() {
            return Err(IrError::IndexNotFound(path.to_path_buf()));
        }
        IndexDescriptor::load(path)
    }

    fn create_fresh(path: &Path, config: &StoreConfig) -> Result<IndexHandle> {
        let tantivy_dir = IndexDescriptor::tantivy_dir(path);
        fs::create_dir_all(&tantivy_dir)?;

        let index = Index::create_in_dir(&tantivy_dir, build_schema())
            .map_err(|e| IrError::StorageError(format!("Failed to create index: {e}")))?;

        let descriptor = IndexDescriptor::new(config.analyzer.clone());
        descriptor.save(path)?;

        tracing::info!("Created index at {:?}", path);
        IndexHandle::new(path, index, config, descriptor, true)
    }
}

/// Point-in-time statistics of an index handle
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub path: PathBuf,
    pub documents: u64,
    pub segments: usize,
    pub pending: u64,
    /// Commits over the lifetime of the index
    pub commits: u64,
    /// Commits made through this handle
    pub session_commits: u64,
    pub intermediate_commits: u64,
    pub read_only: bool,
    pub created_at: DateTime<Utc>,
    pub last_commit_at: Option<DateTime<Utc>>,
    pub analyzer: AnalyzerConfig,
}

/// Session handle on one index
pub struct IndexHandle {
    path: PathBuf,
    index: Index,
    fields: Fields,
    reader: Option<IndexReader>,
    writer: Option<IndexWriter>,
    read_only: bool,
    config: StoreConfig,
    descriptor: IndexDescriptor,
    pending: u64,
    next_sequence: u64,
    session_commits: u64,
    intermediate_commits: u64,
    closed: bool,
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("path", &self.path)
            .field("read_only", &self.read_only)
            .field("pending", &self.pending)
            .field("closed", &self.closed)
            .finish()
    }
}

impl IndexHandle {
    fn load(
        path: &Path,
        config: &StoreConfig,
        descriptor: IndexDescriptor,
        writable: bool,
    ) -> Result<Self> {
        let index = Index::open_in_dir(IndexDescriptor::tantivy_dir(path))
            .map_err(|e| IrError::StorageError(format!("Failed to open index: {e}")))?;
        Self::new(path, index, config, descriptor, writable)
    }

    fn new(
        path: &Path,
        index: Index,
        config: &StoreConfig,
        descriptor: IndexDescriptor,
        writable: bool,
    ) -> Result<Self> {
        index
            .tokenizers()
            .register(ANALYZER_NAME, build_analyzer(&config.analyzer));
        let fields = Fields::resolve(&index.schema())?;

        let writer = if writable {
            Some(Self::acquire_writer(&index, path, config.writer_heap_bytes)?)
        } else {
            None
        };

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IrError::StorageError(format!("Failed to create reader: {e}")))?;
        let next_sequence = reader.searcher().num_docs();

        Ok(Self {
            path: path.to_path_buf(),
            index,
            fields,
            reader: Some(reader),
            writer,
            read_only: !writable,
            config: config.clone(),
            descriptor,
            pending: 0,
            next_sequence,
            session_commits: 0,
            intermediate_commits: 0,
            closed: false,
        })
    }

    fn acquire_writer(index: &Index, path: &Path, heap: usize) -> Result<IndexWriter> {
        let writer: IndexWriter = index.writer(heap).map_err(|e| match e {
            TantivyError::LockFailure(LockError::LockBusy, _) => {
                IrError::LockContention(path.to_path_buf())
            }
            other => IrError::StorageError(format!("Failed to create writer: {other}")),
        })?;
        writer.set_merge_policy(Box::new(NoMergePolicy));
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Writes accepted since the last commit
    pub fn pending(&self) -> u64 {
        self.pending
    }

    pub(crate) fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Searcher over the last commit loaded by this handle
    pub fn searcher(&self) -> Result<Searcher> {
        self.ensure_open()?;
        self.reader
            .as_ref()
            .map(|r| r.searcher())
            .ok_or_else(|| IrError::StoreClosed(self.path.clone()))
    }

    /// The analyzer registered for the abstract field
    pub fn query_analyzer(&self) -> Result<TextAnalyzer> {
        self.ensure_open()?;
        self.index
            .tokenizer_for_field(self.fields.abstract_text)
            .map_err(|e| IrError::SearchFailed(format!("No analyzer for abstract field: {e}")))
    }

    /// Validate one record and add it to the pending batch.
    ///
    /// Commits (without merging) once the batch reaches the commit
    /// threshold.
    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        self.writer_mut()?;
        validate(record)?;

        let doc = self.to_document(record);
        self.writer_mut()?
            .add_document(doc)
            .map_err(|e| IrError::StorageError(format!("Failed to add document: {e}")))?;
        self.pending += 1;
        self.next_sequence += 1;

        if self.pending >= self.config.commit_threshold {
            tracing::info!(
                "Pending writes reached {}, committing",
                self.config.commit_threshold
            );
            self.commit()?;
            self.intermediate_commits += 1;
        }

        Ok(())
    }

    /// Feed a record sequence into the index and finish with a final commit.
    ///
    /// Records failing schema enforcement are rejected one by one and
    /// reported; structural errors abort the ingest.
    pub fn ingest<I>(&mut self, records: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = Record>,
    {
        self.writer_mut()?;
        let mut stats = IngestStats::default();
        let commits_before = self.intermediate_commits;

        for record in records {
            match self.add_record(&record) {
                Ok(()) => stats.ingested += 1,
                Err(e) if e.is_record_level() => {
                    let id = preview(&record.id);
                    tracing::warn!("Rejected record {:?}: {}", id, e);
                    stats.reject(&id, &e);
                }
                Err(e) => return Err(e),
            }
        }

        stats.intermediate_commits = self.intermediate_commits - commits_before;
        stats.compacted = self.finish()?;

        tracing::info!(
            "Ingested {} records ({} rejected, {} intermediate commits)",
            stats.ingested,
            stats.rejected,
            stats.intermediate_commits
        );
        Ok(stats)
    }

    /// Flush pending writes durably and make them visible to queries
    pub fn commit(&mut self) -> Result<()> {
        self.writer_mut()?
            .commit()
            .map_err(|e| IrError::StorageError(format!("Failed to commit: {e}")))?;
        let committed = self.pending;
        self.pending = 0;
        self.session_commits += 1;

        self.reload()?;
        let searcher = self.searcher()?;
        self.descriptor
            .record_commit(searcher.num_docs(), searcher.segment_readers().len());
        self.descriptor.save(&self.path)?;

        tracing::debug!(
            "Committed {} documents ({} total, {} segments)",
            committed,
            self.descriptor.documents,
            self.descriptor.segments
        );
        Ok(())
    }

    /// Final commit, followed by best-effort compaction when configured.
    ///
    /// Returns whether the segments were merged.
    pub fn finish(&mut self) -> Result<bool> {
        self.commit()?;
        if self.config.compact_on_finish {
            self.compact()
        } else {
            Ok(false)
        }
    }

    /// Merge all committed segments into one.
    ///
    /// Keeps the committed segments untouched (and returns `false`) when
    /// the merged segment would exceed `max_compacted_docs` or the merge
    /// fails.
    pub fn compact(&mut self) -> Result<bool> {
        self.writer_mut()?;

        let metas = self
            .index
            .searchable_segment_metas()
            .map_err(|e| IrError::StorageError(format!("Failed to list segments: {e}")))?;
        if metas.len() < 2 {
            return Ok(false);
        }

        let total_docs: u64 = metas.iter().map(|m| u64::from(m.max_doc())).sum();
        if total_docs > self.config.max_compacted_docs {
            tracing::warn!(
                "Skipping compaction: {} documents exceed the single-segment limit of {}",
                total_docs,
                self.config.max_compacted_docs
            );
            return Ok(false);
        }

        let segment_ids: Vec<SegmentId> = metas.iter().map(|m| m.id()).collect();
        let merge = self.writer_mut()?.merge(&segment_ids).wait();
        if let Err(e) = merge {
            tracing::warn!(
                "Compaction failed, keeping {} committed segments: {}",
                segment_ids.len(),
                e
            );
            return Ok(false);
        }

        self.reload()?;
        let searcher = self.searcher()?;
        self.descriptor.segments = searcher.segment_readers().len();
        self.descriptor.save(&self.path)?;

        tracing::info!(
            "Compacted {} segments into {}",
            segment_ids.len(),
            self.descriptor.segments
        );
        Ok(true)
    }

    /// Reload the reader to the latest commit on disk
    pub fn refresh(&mut self) -> Result<()> {
        self.reload()
    }

    /// Release the writer lock and reader.
    ///
    /// Uncommitted writes are discarded. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.reader = None;

        if let Some(mut writer) = self.writer.take() {
            if self.pending > 0 {
                tracing::warn!(
                    "Closing {:?} with {} uncommitted documents, discarding them",
                    self.path,
                    self.pending
                );
                writer
                    .rollback()
                    .map_err(|e| IrError::StorageError(format!("Failed to roll back: {e}")))?;
            }
            writer
                .wait_merging_threads()
                .map_err(|e| IrError::StorageError(format!("Failed to stop writer: {e}")))?;
        }
        self.pending = 0;

        tracing::debug!("Closed index handle for {:?}", self.path);
        Ok(())
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let searcher = self.searcher()?;
        Ok(StoreStats {
            path: self.path.clone(),
            documents: searcher.num_docs(),
            segments: searcher.segment_readers().len(),
            pending: self.pending,
            commits: self.descriptor.commits,
            session_commits: self.session_commits,
            intermediate_commits: self.intermediate_commits,
            read_only: self.read_only,
            created_at: self.descriptor.created_at,
            last_commit_at: self.descriptor.last_commit_at,
            analyzer: self.descriptor.analyzer.clone(),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(IrError::StoreClosed(self.path.clone()));
        }
        Ok(())
    }

    fn writer_mut(&mut self) -> Result<&mut IndexWriter> {
        self.ensure_open()?;
        let path = &self.path;
        self.writer
            .as_mut()
            .ok_or_else(|| IrError::StoreReadOnly(path.clone()))
    }

    fn reload(&mut self) -> Result<()> {
        self.ensure_open()?;
        if let Some(reader) = self.reader.as_ref() {
            reader
                .reload()
                .map_err(|e| IrError::StorageError(format!("Failed to reload reader: {e}")))?;
        }
        Ok(())
    }

    fn to_document(&self, record: &Record) -> TantivyDocument {
        let f = &self.fields;
        let mut doc = TantivyDocument::default();
        doc.add_text(f.id, record.id.trim());
        doc.add_text(f.title, &record.title);
        doc.add_text(f.journal, &record.journal);
        if let Some(year) = record.year {
            doc.add_i64(f.year, year);
        }
        doc.add_text(f.abstract_text, &record.abstract_text);
        for topic in &record.topics {
            doc.add_text(f.topics, topic);
        }
        doc.add_u64(f.sequence, self.next_sequence);
        doc
    }
}

/// Schema enforcement for one record
fn validate(record: &Record) -> Result<()> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(IrError::SchemaViolation("record id is empty".to_string()));
    }
    if id.len() > MAX_TERM_BYTES {
        return Err(IrError::SchemaViolation(format!(
            "record id is {} bytes, the limit is {MAX_TERM_BYTES}",
            id.len()
        )));
    }
    if let Some(topic) = record.topics.iter().find(|t| t.len() > MAX_TERM_BYTES) {
        return Err(IrError::SchemaViolation(format!(
            "topic {:?} of record {} is {} bytes, the limit is {MAX_TERM_BYTES}",
            preview(topic),
            preview(id),
            topic.len()
        )));
    }
    Ok(())
}

/// First 32 characters of a possibly huge value
fn preview(value: &str) -> String {
    match value.char_indices().nth(32) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
