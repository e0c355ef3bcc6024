//! Fixed tantivy schema for article records.
//!
//! Fields:
//! - id: PMID (exact-id: STRING | STORED)
//! - title: article title (stored-text: STORED)
//! - journal: journal title (stored-text: STORED)
//! - year: publication year (numeric: i64 INDEXED | STORED | FAST)
//! - abstract: abstract body (analyzed-text, custom analyzer, positions)
//! - topics: MeSH descriptors (stored-list: STRING | STORED, multi-valued)
//! - sequence: insertion counter (u64 FAST, internal)

use crate::core::error::{IrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED,
    STRING,
};

/// Name the abstract analyzer is registered under
pub const ANALYZER_NAME: &str = "pubmed_abstract";

pub const FIELD_ID: &str = "id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_JOURNAL: &str = "journal";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_ABSTRACT: &str = "abstract";
pub const FIELD_TOPICS: &str = "topics";
pub const FIELD_SEQUENCE: &str = "sequence";

/// Longest value (in bytes) tantivy accepts as a single term
pub const MAX_TERM_BYTES: usize = 65_530;

/// Kind of each field, recorded in the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    StoredText,
    ExactId,
    Numeric,
    StoredList,
    AnalyzedText,
    Sequence,
}

/// Field name to kind for the fixed schema
pub fn field_kinds() -> BTreeMap<String, FieldKind> {
    [
        (FIELD_ID, FieldKind::ExactId),
        (FIELD_TITLE, FieldKind::StoredText),
        (FIELD_JOURNAL, FieldKind::StoredText),
        (FIELD_YEAR, FieldKind::Numeric),
        (FIELD_ABSTRACT, FieldKind::AnalyzedText),
        (FIELD_TOPICS, FieldKind::StoredList),
        (FIELD_SEQUENCE, FieldKind::Sequence),
    ]
    .into_iter()
    .map(|(name, kind)| (name.to_string(), kind))
    .collect()
}

/// Build the tantivy schema
pub fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field(FIELD_ID, STRING | STORED);
    builder.add_text_field(FIELD_TITLE, STORED);
    builder.add_text_field(FIELD_JOURNAL, STORED);
    builder.add_i64_field(FIELD_YEAR, INDEXED | STORED | FAST);

    let abstract_options = TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(ANALYZER_NAME)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored();
    builder.add_text_field(FIELD_ABSTRACT, abstract_options);

    builder.add_text_field(FIELD_TOPICS, STRING | STORED);
    builder.add_u64_field(FIELD_SEQUENCE, FAST);

    builder.build()
}

/// Compare an on-disk schema with the fixed one.
///
/// Returns a description of the difference, if any.
pub fn schema_difference(found: &Schema) -> Option<String> {
    let expected = build_schema();
    let to_json = |schema: &Schema| serde_json::to_value(schema).ok();

    if to_json(found) == to_json(&expected) {
        return None;
    }

    let names = |schema: &Schema| {
        schema
            .fields()
            .map(|(_, entry)| entry.name().to_string())
            .collect::<Vec<_>>()
    };
    Some(format!(
        "on-disk fields {:?} do not match expected fields {:?}",
        names(found),
        names(&expected)
    ))
}

/// Resolved field handles
#[derive(Debug, Clone, Copy)]
pub struct Fields {
    pub id: Field,
    pub title: Field,
    pub journal: Field,
    pub year: Field,
    pub abstract_text: Field,
    pub topics: Field,
    pub sequence: Field,
}

impl Fields {
    pub fn resolve(schema: &Schema) -> Result<Self> {
        let get = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| IrError::StorageError(format!("Missing {name} field: {e}")))
        };

        Ok(Self {
            id: get(FIELD_ID)?,
            title: get(FIELD_TITLE)?,
            journal: get(FIELD_JOURNAL)?,
            year: get(FIELD_YEAR)?,
            abstract_text: get(FIELD_ABSTRACT)?,
            topics: get(FIELD_TOPICS)?,
            sequence: get(FIELD_SEQUENCE)?,
        })
    }
}
