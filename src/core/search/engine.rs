//! BM25 query engine over the abstract field.
//!
//! Queries are analyzed with the analyzer registered for the abstract
//! field, so query terms match indexed terms exactly. Terms are
//! OR-combined; ties in score are broken by insertion order.

use crate::core::config::SearchConfig;
use crate::core::error::{IrError, Result};
use crate::core::storage::analyzer::analyze;
use crate::core::storage::schema::FIELD_SEQUENCE;
use crate::core::storage::IndexHandle;
use crate::core::types::{Record, SearchHit};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::Instant;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{DocId, Score, SegmentReader, TantivyDocument, Term};

/// Ranked hits for one query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub hits: Vec<SearchHit>,
    pub count: usize,
    pub duration_ms: u64,
}

/// Free-text search over an index handle
#[derive(Debug, Clone)]
pub struct SearchEngine {
    default_k: usize,
    max_k: usize,
    max_query_length: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            default_k: config.default_k,
            max_k: config.max_k,
            max_query_length: config.max_query_length,
        }
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Top records for `query_text`, most relevant first
    pub fn search(
        &self,
        handle: &IndexHandle,
        query_text: &str,
        max_results: usize,
    ) -> Result<Vec<Record>> {
        Ok(self
            .search_hits(handle, query_text, max_results)?
            .into_iter()
            .map(|hit| hit.record)
            .collect())
    }

    /// Like [`SearchEngine::search`], with rank and score per record
    pub fn search_hits(
        &self,
        handle: &IndexHandle,
        query_text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }
        let terms = self.query_terms(handle, query_text)?;
        self.search_terms(handle, &terms, max_results)
    }

    /// Search and wrap the hits with timing information
    pub fn search_response(
        &self,
        handle: &IndexHandle,
        query_text: &str,
        max_results: usize,
    ) -> Result<SearchResponse> {
        let start = Instant::now();

        let (terms, hits) = if max_results == 0 {
            (Vec::new(), Vec::new())
        } else {
            let terms = self.query_terms(handle, query_text)?;
            let hits = self.search_terms(handle, &terms, max_results)?;
            (terms, hits)
        };

        Ok(SearchResponse {
            query: query_text.to_string(),
            terms,
            count: hits.len(),
            hits,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Analyzed, de-duplicated query terms in first-occurrence order
    pub fn query_terms(&self, handle: &IndexHandle, query_text: &str) -> Result<Vec<String>> {
        let text = self.truncate(query_text);
        let mut analyzer = handle.query_analyzer()?;

        let mut seen = HashSet::new();
        Ok(analyze(&mut analyzer, text)
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect())
    }

    fn truncate<'a>(&self, query_text: &'a str) -> &'a str {
        match query_text.char_indices().nth(self.max_query_length) {
            Some((idx, _)) => {
                tracing::warn!(
                    "Query longer than {} characters, truncating",
                    self.max_query_length
                );
                &query_text[..idx]
            }
            None => query_text,
        }
    }

    fn search_terms(
        &self,
        handle: &IndexHandle,
        terms: &[String],
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        if terms.is_empty() {
            tracing::debug!("Query has no terms after analysis");
            return Ok(Vec::new());
        }

        let searcher = handle.searcher()?;
        if searcher.num_docs() == 0 {
            return Ok(Vec::new());
        }

        let fields = handle.fields();
        let field = fields.abstract_text;
        let clauses: Vec<(Occur, Box<dyn Query>)> = terms
            .iter()
            .map(|term| {
                let query: Box<dyn Query> = Box::new(TermQuery::new(
                    Term::from_field_text(field, term),
                    IndexRecordOption::WithFreqs,
                ));
                (Occur::Should, query)
            })
            .collect();
        let query = BooleanQuery::new(clauses);

        let limit = max_results.min(self.max_k);
        let collector = TopDocs::with_limit(limit).tweak_score(
            move |segment_reader: &SegmentReader| {
                let sequence = segment_reader.fast_fields().u64(FIELD_SEQUENCE).ok();
                move |doc: DocId, score: Score| {
                    let seq = sequence
                        .as_ref()
                        .and_then(|column| column.first(doc))
                        .unwrap_or(u64::MAX);
                    (score, Reverse(seq))
                }
            },
        );

        let top_docs = searcher
            .search(&query, &collector)
            .map_err(|e| IrError::SearchFailed(format!("Search failed: {e}")))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (rank, ((score, _), address)) in top_docs.into_iter().enumerate() {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                IrError::SearchFailed(format!("Failed to retrieve document: {e}"))
            })?;

            hits.push(SearchHit {
                rank: rank + 1,
                score,
                record: Record {
                    id: extract_text(&doc, fields.id),
                    title: extract_text(&doc, fields.title),
                    journal: extract_text(&doc, fields.journal),
                    year: doc.get_first(fields.year).and_then(|v| v.as_i64()),
                    abstract_text: extract_text(&doc, fields.abstract_text),
                    topics: doc
                        .get_all(fields.topics)
                        .filter_map(|v| v.as_str())
                        .map(str::to_string)
                        .collect(),
                },
            });
        }

        Ok(hits)
    }
}

fn extract_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
