//! Core domain types for pubmed-ir.
//!
//! [`Record`] is the canonical article entity that flows from the
//! corpus reader through the index store and back out of the query
//! engine. The remaining types are reports produced along the way.

use crate::core::error::{IrError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One biomedical article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// External identifier (PMID), the document key
    pub id: String,

    /// Article title
    pub title: String,

    /// Journal title
    pub journal: String,

    /// Publication year, if known
    pub year: Option<i64>,

    /// Abstract body, the only ranked field
    pub abstract_text: String,

    /// MeSH descriptor names in document order
    pub topics: Vec<String>,
}

impl Record {
    /// Create a record with the given id and empty fields.
    ///
    /// Fails with `MalformedRecord` when the id is blank.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(IrError::MalformedRecord(
                "record has no identifier".to_string(),
            ));
        }
        Ok(Self {
            id,
            ..Self::default()
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = journal.into();
        self
    }

    pub fn with_year(mut self, year: Option<i64>) -> Self {
        self.year = year;
        self
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = abstract_text.into();
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Build a record from one JSON object.
    ///
    /// Accepts the dataset keys (`pmid`, `abstractText`, `meshMajor`) as
    /// well as the field names of this struct. `pmid` and `year` may be
    /// numbers or strings.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            IrError::MalformedRecord("expected a JSON object".to_string())
        })?;

        let lookup = |keys: &[&str]| keys.iter().find_map(|k| obj.get(*k));

        let id = match lookup(&["pmid", "id"]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let mut record = Record::new(id)?;

        record.title = json_text(lookup(&["title"]));
        record.journal = json_text(lookup(&["journal"]));
        record.abstract_text = json_text(lookup(&["abstractText", "abstract_text", "abstract"]));
        record.year = lookup(&["year"]).and_then(|v| parse_year(v, &record.id));
        record.topics = match lookup(&["meshMajor", "topics"]) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        Ok(record)
    }

    /// Whether the record carries any abstract text
    pub fn has_abstract(&self) -> bool {
        !self.abstract_text.trim().is_empty()
    }
}

fn json_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Parse a year from a JSON value; non-integers are treated as absent.
fn parse_year(value: &Value, id: &str) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null => return None,
        _ => None,
    };
    if parsed.is_none() {
        tracing::debug!("Ignoring non-integer year {value} for record {id}");
    }
    parsed
}

/// Parse the text content of a `<Year>` element.
pub fn parse_year_text(text: &str, id: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(year) => Some(year),
        Err(_) => {
            tracing::debug!("Ignoring non-integer year {trimmed:?} for record {id}");
            None
        }
    }
}

/// One ranked search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based rank
    pub rank: usize,
    pub score: f32,
    pub record: Record,
}

/// A record the store refused to write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rejection {
    pub id: String,
    pub reason: String,
}

/// Outcome of feeding a record sequence into an index handle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Records written to the index
    pub ingested: u64,

    /// Records refused by schema enforcement
    pub rejected: u64,

    /// First few rejections, for reporting
    pub rejections: Vec<Rejection>,

    /// Intermediate commits triggered by the batch threshold
    pub intermediate_commits: u64,

    /// Whether the final commit compacted the index into one segment
    pub compacted: bool,
}

impl IngestStats {
    /// Maximum number of rejections kept verbatim
    pub const REJECTION_SAMPLE: usize = 100;

    pub(crate) fn reject(&mut self, id: &str, err: &IrError) {
        self.rejected += 1;
        if self.rejections.len() < Self::REJECTION_SAMPLE {
            self.rejections.push(Rejection {
                id: id.to_string(),
                reason: err.to_string(),
            });
        }
    }
}

/// Per-shard outcome of a corpus pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShardReport {
    pub path: PathBuf,

    /// The gzip stream was opened and its header read
    #[serde(default)]
    pub opened: bool,

    /// Records successfully extracted
    pub records: u64,

    /// Fragments skipped because they were malformed
    pub skipped: u64,

    /// Error that ended the shard early, if any
    pub error: Option<String>,
}

impl ShardReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            opened: false,
            records: 0,
            skipped: 0,
            error: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.skipped == 0
    }

    /// The shard could not be opened at all
    pub fn open_failed(&self) -> bool {
        !self.opened && self.error.is_some()
    }
}
