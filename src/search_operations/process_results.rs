use std::cmp::Ordering;

use super::{QueryResult, ScoredRecord};
use crate::catalog::Catalog;
use crate::filters::SearchFilters;

/// Filter scored rows, stable-sort by score descending and keep the first `limit`.
pub fn rank_and_truncate(
    catalog: &Catalog,
    scores: &[f64],
    filters: &SearchFilters,
    limit: usize,
) -> QueryResult {
    let mut candidates: Vec<(usize, f64)> = catalog
        .records()
        .iter()
        .zip(scores.iter().copied())
        .enumerate()
        .filter(|(_, (record, _))| filters.matches(record))
        .map(|(position, (_, score))| (position, score))
        .collect();

    let total_matches = candidates.len();

    // sort_by is stable: equal scores keep catalog order.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    candidates.truncate(limit);

    let hits = candidates
        .into_iter()
        .filter_map(|(position, score)| {
            catalog.get(position).map(|record| ScoredRecord {
                position,
                record: record.clone(),
                score,
            })
        })
        .collect();

    QueryResult {
        hits,
        total_matches,
    }
}
