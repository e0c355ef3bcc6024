//! Text analysis pipeline for the abstract field.
//!
//! The same pipeline runs at ingest and query time:
//! `SimpleTokenizer` -> `RemoveLongFilter` -> `LowerCaser` ->
//! `RemoveShortFilter` -> `StopWordFilter` -> `Stemmer`.

use crate::core::config::{AnalyzerConfig, StemLanguage};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, Token, TokenFilter, TokenStream, Tokenizer,
};

impl From<StemLanguage> for Language {
    fn from(lang: StemLanguage) -> Self {
        match lang {
            StemLanguage::Arabic => Language::Arabic,
            StemLanguage::Danish => Language::Danish,
            StemLanguage::Dutch => Language::Dutch,
            StemLanguage::English => Language::English,
            StemLanguage::Finnish => Language::Finnish,
            StemLanguage::French => Language::French,
            StemLanguage::German => Language::German,
            StemLanguage::Greek => Language::Greek,
            StemLanguage::Hungarian => Language::Hungarian,
            StemLanguage::Italian => Language::Italian,
            StemLanguage::Norwegian => Language::Norwegian,
            StemLanguage::Portuguese => Language::Portuguese,
            StemLanguage::Romanian => Language::Romanian,
            StemLanguage::Russian => Language::Russian,
            StemLanguage::Spanish => Language::Spanish,
            StemLanguage::Swedish => Language::Swedish,
            StemLanguage::Tamil => Language::Tamil,
            StemLanguage::Turkish => Language::Turkish,
        }
    }
}

/// Drops tokens with fewer than `min_chars` characters
#[derive(Clone, Debug)]
pub struct RemoveShortFilter {
    min_chars: usize,
}

impl RemoveShortFilter {
    pub fn limit(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl TokenFilter for RemoveShortFilter {
    type Tokenizer<T: Tokenizer> = RemoveShortFilterWrapper<T>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> RemoveShortFilterWrapper<T> {
        RemoveShortFilterWrapper {
            min_chars: self.min_chars,
            inner: tokenizer,
        }
    }
}

#[derive(Clone)]
pub struct RemoveShortFilterWrapper<T> {
    min_chars: usize,
    inner: T,
}

impl<T: Tokenizer> Tokenizer for RemoveShortFilterWrapper<T> {
    type TokenStream<'a> = RemoveShortFilterStream<T::TokenStream<'a>>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        RemoveShortFilterStream {
            min_chars: self.min_chars,
            tail: self.inner.token_stream(text),
        }
    }
}

pub struct RemoveShortFilterStream<T> {
    min_chars: usize,
    tail: T,
}

impl<T: TokenStream> TokenStream for RemoveShortFilterStream<T> {
    fn advance(&mut self) -> bool {
        while self.tail.advance() {
            if self.tail.token().text.chars().count() >= self.min_chars {
                return true;
            }
        }
        false
    }

    fn token(&self) -> &Token {
        self.tail.token()
    }

    fn token_mut(&mut self) -> &mut Token {
        self.tail.token_mut()
    }
}

/// Build the analyzer described by `config`
pub fn build_analyzer(config: &AnalyzerConfig) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(config.max_token_length))
        .filter(LowerCaser)
        .filter(RemoveShortFilter::limit(config.min_token_length))
        .filter(StopWordFilter::remove(config.stop_words.iter().cloned()))
        .filter(Stemmer::new(config.language.into()))
        .build()
}

/// Run `text` through the analyzer and collect the resulting terms
pub fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while stream.advance() {
        terms.push(stream.token().text.clone());
    }
    terms
}

/// Short human-readable summary, used in mismatch errors
pub fn describe(config: &AnalyzerConfig) -> String {
    format!(
        "{} stemmer, {} stop words, token length {}..={}",
        config.language,
        config.stop_words.len(),
        config.min_token_length,
        config.max_token_length
    )
}
