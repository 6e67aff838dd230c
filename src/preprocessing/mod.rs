pub mod preprocess_query;
pub mod stop_words;

use lazy_static::lazy_static;
use regex::Regex;

pub use preprocess_query::{preprocess_query, tokenize};

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedQuery {
    pub cleaned_text: String,
    /// Lowercased tokens in input order, stop words removed, duplicates kept.
    pub terms: Vec<String>,
}

lazy_static! {
    // Runs of two or more word characters.
    static ref TOKEN_REGEX: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}
