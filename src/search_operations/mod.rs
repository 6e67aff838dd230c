mod process_results;
mod search_similar;

pub use process_results::rank_and_truncate;
pub use search_similar::search_similar;

use serde::Serialize;

use crate::catalog::ApiRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    /// Row index in the catalog the record came from.
    pub position: usize,
    pub record: ApiRecord,
    /// Cosine similarity in [0, 1].
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct QueryResult {
    pub hits: Vec<ScoredRecord>,
    /// Records that passed the filters, before truncation.
    pub total_matches: usize,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn best_score(&self) -> f64 {
        self.hits.first().map(|h| h.score).unwrap_or(0.0)
    }
}
