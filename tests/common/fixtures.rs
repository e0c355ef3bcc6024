// Test fixtures for integration testing

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One `<PubmedArticle>` fragment
#[allow(dead_code)] // Used in integration tests
#[derive(Debug, Clone, Default)]
pub struct TestArticle {
    pub pmid: String,
    pub title: String,
    pub journal: String,
    pub year: Option<i64>,
    pub abstract_text: String,
    pub mesh: Vec<String>,
}

/// Article with only a PMID and an abstract
#[allow(dead_code)] // Used in integration tests
pub fn article(pmid: &str, abstract_text: &str) -> TestArticle {
    TestArticle {
        pmid: pmid.to_string(),
        abstract_text: abstract_text.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)] // Used in integration tests
impl TestArticle {
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn journal(mut self, journal: &str) -> Self {
        self.journal = journal.to_string();
        self
    }

    pub fn year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn mesh(mut self, label: &str) -> Self {
        self.mesh.push(label.to_string());
        self
    }

    /// Render in the MEDLINE citation layout
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<PubmedArticle><MedlineCitation>");
        xml.push_str(&format!("<PMID Version=\"1\">{}</PMID>", self.pmid));
        xml.push_str("<DateCompleted><Year>1999</Year></DateCompleted>");
        xml.push_str("<Article><Journal><JournalIssue><PubDate>");
        if let Some(year) = self.year {
            xml.push_str(&format!("<Year>{year}</Year>"));
        }
        xml.push_str("</PubDate></JournalIssue>");
        xml.push_str(&format!("<Title>{}</Title></Journal>", escape(&self.journal)));
        xml.push_str(&format!(
            "<ArticleTitle>{}</ArticleTitle>",
            escape(&self.title)
        ));
        xml.push_str(&format!(
            "<Abstract><AbstractText>{}</AbstractText></Abstract>",
            escape(&self.abstract_text)
        ));
        xml.push_str("</Article>");
        if !self.mesh.is_empty() {
            xml.push_str("<MeshHeadingList>");
            for label in &self.mesh {
                xml.push_str(&format!(
                    "<MeshHeading><DescriptorName MajorTopicYN=\"N\">{}</DescriptorName></MeshHeading>",
                    escape(label)
                ));
            }
            xml.push_str("</MeshHeadingList>");
        }
        xml.push_str("</MedlineCitation></PubmedArticle>");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Temporary corpus directory of gzip-compressed shards
#[allow(dead_code)] // Used in integration tests
pub struct CorpusDir {
    pub dir: TempDir,
}

#[allow(dead_code)] // Used in integration tests
impl CorpusDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a well-formed shard holding `articles`
    pub fn add_shard(&self, name: &str, articles: &[TestArticle]) -> PathBuf {
        let body: String = articles.iter().map(TestArticle::to_xml).collect();
        self.add_raw_shard(name, &format!("<PubmedArticleSet>{body}</PubmedArticleSet>"))
    }

    /// Write arbitrary (possibly broken) XML as a gzip shard
    pub fn add_raw_shard(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::fast());
        encoder.write_all(xml.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    /// Write bytes that are not gzip at all
    pub fn add_garbage_shard(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"this is not gzip data").unwrap();
        path
    }
}
