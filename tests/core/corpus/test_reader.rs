// Integration tests for corpus discovery and streaming extraction

use crate::common::{article, CorpusDir};
use pubmed_ir::core::config::CorpusConfig;
use pubmed_ir::core::corpus::{CorpusReader, ShardReader};
use pubmed_ir::core::error::IrError;

fn reader() -> CorpusReader {
    CorpusReader::new(&CorpusConfig::default()).unwrap()
}

#[test]
fn test_all_fields_are_extracted() {
    let corpus = CorpusDir::new();
    corpus.add_shard(
        "pubmed20n0001.xml.gz",
        &[article("31000001", "Insulin resistance in adolescents.")
            .title("Metabolic outcomes")
            .journal("Pediatric Research")
            .year(2019)
            .mesh("Insulin Resistance")
            .mesh("Adolescent")],
    );

    let records: Vec<_> = reader()
        .records(corpus.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "31000001");
    assert_eq!(record.title, "Metabolic outcomes");
    assert_eq!(record.journal, "Pediatric Research");
    assert_eq!(record.year, Some(2019));
    assert_eq!(record.abstract_text, "Insulin resistance in adolescents.");
    assert_eq!(record.topics, vec!["Insulin Resistance", "Adolescent"]);
}

#[test]
fn test_escaped_text_is_unescaped() {
    let corpus = CorpusDir::new();
    corpus.add_shard(
        "pubmed01.xml.gz",
        &[article("1", "IL-6 < 5 pg/mL & CRP > 3").title("A & B")],
    );

    let records: Vec<_> = reader()
        .records(corpus.path())
        .unwrap()
        .filter_map(|r| r.ok())
        .collect();
    assert_eq!(records[0].abstract_text, "IL-6 < 5 pg/mL & CRP > 3");
    assert_eq!(records[0].title, "A & B");
}

#[test]
fn test_good_then_truncated_fragment() {
    let corpus = CorpusDir::new();
    let good = article("1", "complete").to_xml();
    let path = corpus.add_raw_shard(
        "pubmed01.xml.gz",
        &format!("<PubmedArticleSet>{good}<PubmedArticle><PMID>2</PMID><AbstractText>cut"),
    );

    let mut shard = ShardReader::open(&path).unwrap();
    let first = shard.next().unwrap().unwrap();
    assert_eq!(first.id, "1");

    let second = shard.next().unwrap().unwrap_err();
    assert!(matches!(second, IrError::MalformedRecord(_)));
    assert!(second.is_record_level());

    assert!(shard.next().is_none());
    let report = shard.into_report();
    assert_eq!(report.records, 1);
    assert!(report.error.is_some());
}

#[test]
fn test_unreadable_shard_is_reported_and_skipped() {
    let corpus = CorpusDir::new();
    corpus.add_shard("pubmed01.xml.gz", &[article("1", "first")]);
    corpus.add_garbage_shard("pubmed02.xml.gz");
    corpus.add_shard("pubmed03.xml.gz", &[article("3", "third")]);

    let mut records = reader().records(corpus.path()).unwrap();
    assert_eq!(records.shard_count(), 3);

    let items: Vec<_> = records.by_ref().collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap().id, "1");
    assert!(matches!(items[1], Err(IrError::ShardOpen { .. })));
    assert_eq!(items[2].as_ref().unwrap().id, "3");

    let reports = records.into_reports();
    assert_eq!(reports.len(), 3);
    assert!(reports[1].error.is_some());
    assert!(reports[0].is_clean());
    assert!(reports[2].is_clean());
}

#[test]
fn test_custom_shard_pattern() {
    let corpus = CorpusDir::new();
    corpus.add_shard("medline-a.xml.gz", &[article("1", "one")]);
    corpus.add_shard("pubmed01.xml.gz", &[article("2", "two")]);

    let reader = CorpusReader::new(&CorpusConfig {
        shard_prefix: "medline".to_string(),
        ..CorpusConfig::default()
    })
    .unwrap();

    let ids: Vec<String> = reader
        .records(corpus.path())
        .unwrap()
        .filter_map(|r| r.ok())
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["1"]);
}

#[test]
fn test_empty_corpus_dir_yields_nothing() {
    let corpus = CorpusDir::new();
    let mut records = reader().records(corpus.path()).unwrap();
    assert_eq!(records.shard_count(), 0);
    assert!(records.next().is_none());
}

#[test]
fn test_shard_without_identified_articles_keeps_corpus_going() {
    let corpus = CorpusDir::new();
    corpus.add_shard("pubmed01.xml.gz", &[article("1", "first")]);
    corpus.add_raw_shard(
        "pubmed02.xml.gz",
        "<PubmedArticleSet><PubmedArticle><MedlineCitation>\
         <Article><Abstract><AbstractText>no identifier</AbstractText></Abstract></Article>\
         </MedlineCitation></PubmedArticle></PubmedArticleSet>",
    );
    corpus.add_shard("pubmed03.xml.gz", &[article("3", "third")]);

    let items: Vec<_> = reader().records(corpus.path()).unwrap().collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap().id, "1");
    assert!(matches!(items[1], Err(IrError::MalformedRecord(_))));
    assert_eq!(items[2].as_ref().unwrap().id, "3");
}

#[test]
fn test_opened_flag_separates_unreadable_from_truncated() {
    let corpus = CorpusDir::new();
    corpus.add_garbage_shard("pubmed01.xml.gz");
    corpus.add_raw_shard(
        "pubmed02.xml.gz",
        "<PubmedArticleSet><PubmedArticle><PMID>2</PMID><AbstractText>cut",
    );

    let mut records = reader().records(corpus.path()).unwrap();
    let _: Vec<_> = records.by_ref().collect();
    let reports = records.into_reports();

    assert!(reports[0].open_failed());
    assert!(reports[1].opened);
    assert!(reports[1].error.is_some());
    assert!(!reports[1].open_failed());
}
