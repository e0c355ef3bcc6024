//! Streaming reader for one gzip-compressed XML shard.
//!
//! The shard is decompressed and parsed as a stream of XML events, so
//! memory use is bounded by the size of a single article regardless of
//! the shard size.

use flate2::read::MultiGzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::corpus::fragment::{Fragment, ARTICLE_TAG};
use crate::core::error::{IrError, Result};
use crate::core::types::{Record, ShardReport};

type ShardStream = BufReader<MultiGzDecoder<File>>;

/// Lazy, finite sequence of records from one shard
pub struct ShardReader {
    path: PathBuf,
    reader: Reader<ShardStream>,
    buf: Vec<u8>,
    report: ShardReport,
    finished: bool,
}

impl std::fmt::Debug for ShardReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardReader")
            .field("path", &self.path)
            .field("report", &self.report)
            .field("finished", &self.finished)
            .finish()
    }
}

/// What the event loop decided after one XML event
enum Step {
    Continue,
    Emit,
    Fail(String),
    Done,
}

impl ShardReader {
    /// Open a shard as a gzip-decompressing buffered XML stream.
    ///
    /// The gzip header is read eagerly, so a file that is not gzip fails
    /// here with `ShardOpen` rather than on the first record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let shard_open = |e: std::io::Error| IrError::ShardOpen {
            path: path.clone(),
            message: e.to_string(),
        };

        let file = File::open(&path).map_err(shard_open)?;
        let mut stream = BufReader::new(MultiGzDecoder::new(file));
        stream.fill_buf().map_err(shard_open)?;

        tracing::debug!("Opened shard {:?}", path);

        Ok(Self {
            reader: Reader::from_reader(stream),
            buf: Vec::with_capacity(8 * 1024),
            report: ShardReport {
                opened: true,
                ..ShardReport::new(&path)
            },
            path,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counters for what has been read so far
    pub fn report(&self) -> &ShardReport {
        &self.report
    }

    pub fn into_report(self) -> ShardReport {
        self.report
    }

    /// Whether the reader has hit end of stream or a fatal error
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn read_next(&mut self) -> Option<Result<Record>> {
        let mut fragment: Option<Fragment> = None;

        loop {
            self.buf.clear();
            let step = match self.reader.read_event_into(&mut self.buf) {
                Err(e) => Step::Fail(format!(
                    "XML error near byte {}: {e}",
                    self.reader.buffer_position()
                )),
                Ok(Event::Start(e)) => {
                    let name = e.local_name();
                    if let Some(f) = fragment.as_mut() {
                        f.start(name.as_ref());
                    } else if name.as_ref() == ARTICLE_TAG {
                        fragment = Some(Fragment::new());
                    }
                    Step::Continue
                }
                Ok(Event::End(_)) => match fragment.as_mut() {
                    Some(f) if f.depth() == 0 => Step::Emit,
                    Some(f) => {
                        f.end();
                        Step::Continue
                    }
                    None => Step::Continue,
                },
                Ok(Event::Text(t)) => {
                    if let Some(f) = fragment.as_mut() {
                        match t.unescape() {
                            Ok(text) => f.text(&text),
                            Err(_) => f.text(&String::from_utf8_lossy(&t)),
                        }
                    }
                    Step::Continue
                }
                Ok(Event::CData(c)) => {
                    if let Some(f) = fragment.as_mut() {
                        f.text(&String::from_utf8_lossy(&c.into_inner()));
                    }
                    Step::Continue
                }
                Ok(Event::Eof) => match fragment {
                    Some(_) => Step::Fail("unexpected end of shard inside PubmedArticle".to_string()),
                    None => Step::Done,
                },
                // Empty elements carry no text; comments, PIs and doctype are irrelevant
                Ok(_) => Step::Continue,
            };

            match step {
                Step::Continue => {}
                Step::Emit => {
                    let Some(f) = fragment.take() else {
                        continue;
                    };
                    return Some(match f.finish() {
                        Ok(record) => {
                            self.report.records += 1;
                            Ok(record)
                        }
                        Err(e) => {
                            self.report.skipped += 1;
                            tracing::warn!("Skipping fragment in {:?}: {}", self.path, e);
                            Err(e)
                        }
                    });
                }
                Step::Fail(message) => {
                    self.finished = true;
                    if fragment.is_some() {
                        self.report.skipped += 1;
                    }
                    let message = format!("{}: {message}", self.path.display());
                    tracing::warn!("Abandoning shard: {}", message);
                    self.report.error = Some(message.clone());
                    return Some(Err(IrError::MalformedRecord(message)));
                }
                Step::Done => {
                    self.finished = true;
                    tracing::debug!(
                        "Finished shard {:?}: {} records, {} skipped",
                        self.path,
                        self.report.records,
                        self.report.skipped
                    );
                    return None;
                }
            }
        }
    }
}

impl Iterator for ShardReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.read_next()
    }
}
