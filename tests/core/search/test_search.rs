// Integration tests for BM25 search

use crate::common::{build_index, create_test_services, ids, record};
use pubmed_ir::core::types::Record;

#[test]
fn test_unique_term_finds_its_record() {
    let (_temp, _path, handle) = build_index(vec![
        record("10", "Hemoglobin glycation in diabetes"),
        record("11", "Telomere shortening in aging"),
        record("12", "Gut microbiome diversity"),
    ]);
    let services = create_test_services();

    let results = services.search.search(&handle, "telomere", 10).unwrap();
    assert_eq!(ids(&results), vec!["11"]);
}

#[test]
fn test_stored_fields_round_trip() {
    let stored = Record::new("4242")
        .unwrap()
        .with_title("Sepsis biomarkers")
        .with_journal("Critical Care")
        .with_year(Some(2021))
        .with_abstract("Procalcitonin guides antibiotic therapy.")
        .with_topics(["Sepsis", "Procalcitonin"]);
    let (_temp, _path, handle) = build_index(vec![stored.clone()]);
    let services = create_test_services();

    let results = services.search.search(&handle, "procalcitonin", 1).unwrap();
    assert_eq!(results, vec![stored]);
}

#[test]
fn test_missing_year_round_trips_as_none() {
    let (_temp, _path, handle) = build_index(vec![record("1", "undated abstract")]);
    let services = create_test_services();

    let results = services.search.search(&handle, "undated", 1).unwrap();
    assert_eq!(results[0].year, None);
    assert!(results[0].topics.is_empty());
}

#[test]
fn test_higher_term_frequency_ranks_first() {
    let (_temp, _path, handle) = build_index(vec![
        record("low", "malaria vaccine trial in children"),
        record("high", "malaria malaria malaria vaccine trial"),
    ]);
    let services = create_test_services();

    let results = services.search.search(&handle, "malaria", 10).unwrap();
    assert_eq!(ids(&results), vec!["high", "low"]);
}

#[test]
fn test_equal_scores_keep_insertion_order() {
    let (_temp, _path, handle) = build_index(vec![
        record("1", "cats hunt mice"),
        record("2", "dogs hunt cats"),
    ]);
    let services = create_test_services();

    let results = services.search.search(&handle, "cats", 10).unwrap();
    assert_eq!(ids(&results), vec!["1", "2"]);
}

#[test]
fn test_query_is_stemmed_like_documents() {
    let (_temp, _path, handle) = build_index(vec![record("1", "Running improves mood")]);
    let services = create_test_services();

    let results = services.search.search(&handle, "RUNS", 10).unwrap();
    assert_eq!(ids(&results), vec!["1"]);
}

#[test]
fn test_stop_word_only_query_is_empty() {
    let (_temp, _path, handle) = build_index(vec![record("1", "the role of the liver")]);
    let services = create_test_services();

    assert!(services
        .search
        .search(&handle, "the of and", 10)
        .unwrap()
        .is_empty());
}

#[test]
fn test_empty_index_returns_nothing() {
    let (_temp, _path, handle) = build_index(Vec::new());
    let services = create_test_services();

    assert!(services.search.search(&handle, "anything", 10).unwrap().is_empty());
}

#[test]
fn test_zero_limit_and_no_match() {
    let (_temp, _path, handle) = build_index(vec![record("1", "kidney function")]);
    let services = create_test_services();

    assert!(services.search.search(&handle, "kidney", 0).unwrap().is_empty());
    assert!(services.search.search(&handle, "pancreas", 5).unwrap().is_empty());
}

#[test]
fn test_limit_caps_results_and_ranks_are_one_based() {
    let records = (0..20)
        .map(|i| record(&i.to_string(), "antibody response"))
        .collect();
    let (_temp, _path, handle) = build_index(records);
    let services = create_test_services();

    let hits = services.search.search_hits(&handle, "antibody", 5).unwrap();
    assert_eq!(hits.len(), 5);
    let ranks: Vec<usize> = hits.iter().map(|h| h.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_search_response_reports_terms() {
    let (_temp, _path, handle) = build_index(vec![record("1", "vitamin d and kidney stones")]);
    let services = create_test_services();

    let response = services
        .search
        .search_response(&handle, "Vitamin kidney vitamin", 10)
        .unwrap();
    assert_eq!(response.terms, vec!["vitamin", "kidney"]);
    assert_eq!(response.count, 1);
}
