//! Field extraction for one `<PubmedArticle>` element.
//!
//! The accumulator is fed the element events found between the
//! article's start and end tags. Each field takes the first matching
//! element anywhere in the subtree; `DescriptorName` collects every
//! occurrence. Text of nested inline markup (`<i>`, `<sup>`, ...) is
//! concatenated into the enclosing field.

use crate::core::error::{IrError, Result};
use crate::core::types::{parse_year_text, Record};

pub(crate) const ARTICLE_TAG: &[u8] = b"PubmedArticle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Id,
    Title,
    Abstract,
    Journal,
    Year,
    Topic,
}

#[derive(Debug)]
struct Capture {
    slot: Slot,
    depth: usize,
    text: String,
}

/// Accumulates the fields of one article
#[derive(Debug, Default)]
pub(crate) struct Fragment {
    /// Open elements below `<PubmedArticle>`
    depth: usize,
    capture: Option<Capture>,
    pub_date_depth: Option<usize>,
    id: Option<String>,
    title: Option<String>,
    abstract_text: Option<String>,
    journal: Option<String>,
    year: Option<String>,
    topics: Vec<String>,
}

impl Fragment {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Depth of open elements below the article root
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn start(&mut self, name: &[u8]) {
        self.depth += 1;
        if self.capture.is_some() {
            return;
        }

        let slot = match name {
            b"PMID" if self.id.is_none() => Some(Slot::Id),
            b"ArticleTitle" if self.title.is_none() => Some(Slot::Title),
            b"AbstractText" if self.abstract_text.is_none() => Some(Slot::Abstract),
            b"Title" if self.journal.is_none() => Some(Slot::Journal),
            b"Year" if self.year.is_none() && self.in_pub_date() => Some(Slot::Year),
            b"DescriptorName" => Some(Slot::Topic),
            b"PubDate" => {
                self.pub_date_depth = Some(self.depth);
                None
            }
            _ => None,
        };

        if let Some(slot) = slot {
            self.capture = Some(Capture {
                slot,
                depth: self.depth,
                text: String::new(),
            });
        }
    }

    pub(crate) fn end(&mut self) {
        if self
            .capture
            .as_ref()
            .is_some_and(|c| c.depth == self.depth)
        {
            if let Some(capture) = self.capture.take() {
                self.store(capture.slot, capture.text);
            }
        }
        if self.pub_date_depth == Some(self.depth) {
            self.pub_date_depth = None;
        }
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    /// Turn the accumulated fields into a record
    pub(crate) fn finish(self) -> Result<Record> {
        let id = self.id.unwrap_or_default();
        if id.is_empty() {
            return Err(IrError::MalformedRecord(
                "PubmedArticle without PMID".to_string(),
            ));
        }
        let year = self
            .year
            .as_deref()
            .and_then(|text| parse_year_text(text, &id));

        Ok(Record::new(id)?
            .with_title(self.title.unwrap_or_default())
            .with_journal(self.journal.unwrap_or_default())
            .with_year(year)
            .with_abstract(self.abstract_text.unwrap_or_default())
            .with_topics(self.topics))
    }

    /// `Year` counts only as a direct child of `PubDate`
    fn in_pub_date(&self) -> bool {
        self.pub_date_depth
            .is_some_and(|d| d + 1 == self.depth)
    }

    fn store(&mut self, slot: Slot, text: String) {
        let text = text.trim().to_string();
        match slot {
            Slot::Id => self.id = Some(text),
            Slot::Title => self.title = Some(text),
            Slot::Abstract => self.abstract_text = Some(text),
            Slot::Journal => self.journal = Some(text),
            Slot::Year => self.year = Some(text),
            Slot::Topic => {
                if !text.is_empty() {
                    self.topics.push(text);
                }
            }
        }
    }
}
