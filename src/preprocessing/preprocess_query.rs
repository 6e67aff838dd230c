use super::stop_words::is_stop_word;
use super::{ProcessedQuery, TOKEN_REGEX, WHITESPACE_REGEX};

/// Split text into index terms. Used for both catalog text and queries so
/// that both land in the same term space.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

pub fn preprocess_query(query: &str) -> ProcessedQuery {
    let cleaned_text = WHITESPACE_REGEX
        .replace_all(query.trim(), " ")
        .to_lowercase();
    let terms = tokenize(&cleaned_text);

    ProcessedQuery {
        cleaned_text,
        terms,
    }
}
