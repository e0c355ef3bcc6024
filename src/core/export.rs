//! Search result export.
//!
//! The XML layout is the one consumed by the downstream QA system:
//!
//! ```xml
//! <IR>
//!   <Result PMID="123">
//!     <Journal>..</Journal>
//!     <Year>..</Year>
//!     <Title>..</Title>
//!     <Abstract>..</Abstract>
//!     <MeSH>label</MeSH>
//!   </Result>
//! </IR>
//! ```

use crate::core::error::{IrError, Result};
use crate::core::types::{Record, SearchHit};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Cursor;

pub const IR_TAG: &str = "IR";
pub const RESULT_TAG: &str = "Result";

fn xml_error(e: impl Display) -> IrError {
    IrError::IoError(std::io::Error::other(format!("XML export failed: {e}")))
}

/// Render records as an `<IR>` element
pub fn records_to_xml<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Start(BytesStart::new(IR_TAG)))
        .map_err(xml_error)?;
    for record in records {
        write_result(&mut writer, record)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(IR_TAG)))
        .map_err(xml_error)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(xml_error)
}

/// Render ranked hits as an `<IR>` element, in rank order
pub fn hits_to_xml(hits: &[SearchHit]) -> Result<String> {
    records_to_xml(hits.iter().map(|hit| &hit.record))
}

fn write_result(writer: &mut Writer<Cursor<Vec<u8>>>, record: &Record) -> Result<()> {
    let start = BytesStart::new(RESULT_TAG).with_attributes([("PMID", record.id.as_str())]);
    writer.write_event(Event::Start(start)).map_err(xml_error)?;

    let year = record.year.map(|y| y.to_string()).unwrap_or_default();
    write_text_element(writer, "Journal", &record.journal)?;
    write_text_element(writer, "Year", &year)?;
    write_text_element(writer, "Title", &record.title)?;
    write_text_element(writer, "Abstract", &record.abstract_text)?;
    for topic in &record.topics {
        write_text_element(writer, "MeSH", topic)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(RESULT_TAG)))
        .map_err(xml_error)?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_error)?;
    // always emitted so empty elements stay on one line
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_error)?;
    Ok(())
}
