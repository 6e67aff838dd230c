use tracing::debug;

use super::{rank_and_truncate, QueryResult};
use crate::catalog::Catalog;
use crate::errors::SearchError;
use crate::filters::SearchFilters;
use crate::preprocessing::preprocess_query;
use crate::ranking::RankerIndex;

/// Score `query` against every record, apply `filters`, return the top `limit`.
///
/// A query with no known terms scores 0 everywhere, which turns this into a
/// filter-only browse in catalog order.
pub fn search_similar(
    query: &str,
    catalog: &Catalog,
    index: &RankerIndex,
    filters: &SearchFilters,
    limit: usize,
) -> Result<QueryResult, SearchError> {
    index.ensure_matches(catalog)?;

    let processed = preprocess_query(query);
    debug!("Processed query: '{}' -> {:?}", processed.cleaned_text, processed.terms);

    let scores = index.score(&processed.terms);
    let result = rank_and_truncate(catalog, &scores, filters, limit);

    debug!(
        "Query '{}' matched {} records, returning {} (best score {:.3})",
        processed.cleaned_text,
        result.total_matches,
        result.len(),
        result.best_score()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_records, Cors};
    use pretty_assertions::assert_eq;

    fn sample_index() -> (Catalog, RankerIndex) {
        let catalog = Catalog::sample();
        let index = RankerIndex::build(&catalog, 1000);
        (catalog, index)
    }

    #[test]
    fn test_weather_forecast_ranks_openweathermap_first() {
        let (catalog, index) = sample_index();
        let result =
            search_similar("weather forecast", &catalog, &index, &SearchFilters::default(), 1)
                .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.hits[0].record.name, "OpenWeatherMap");
        assert!(result.hits[0].score > 0.0);
    }

    #[test]
    fn test_empty_query_browses_in_catalog_order() {
        let (catalog, index) = sample_index();
        let result = search_similar("", &catalog, &index, &SearchFilters::default(), 5).unwrap();

        assert_eq!(result.len(), 5);
        let positions: Vec<usize> = result.hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
        assert!(result.hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_results_sorted_and_bounded() {
        let (catalog, index) = sample_index();
        for query in ["random user data", "cat dog animals", "photos pictures", "news", "zzz"] {
            let result =
                search_similar(query, &catalog, &index, &SearchFilters::default(), 20).unwrap();
            assert_eq!(result.len(), 12);
            for pair in result.hits.windows(2) {
                assert!(pair[0].score >= pair[1].score, "Unsorted for '{}'", query);
                if pair[0].score == pair[1].score {
                    assert!(pair[0].position < pair[1].position, "Unstable for '{}'", query);
                }
            }
            assert!(result.hits.iter().all(|h| (0.0..=1.0).contains(&h.score)));
        }
    }

    #[test]
    fn test_filtered_results_satisfy_every_predicate() {
        let (catalog, index) = sample_index();
        let filters = SearchFilters::default()
            .with_auth_types(["No"])
            .cors_yes(true)
            .https_only(true);

        let result = search_similar("data", &catalog, &index, &filters, 20).unwrap();
        assert_eq!(result.total_matches, 4);
        assert!(result
            .hits
            .iter()
            .all(|h| h.record.auth == "No" && h.record.cors == Cors::Yes && h.record.https));
    }

    #[test]
    fn test_browse_count_equals_filter_count() {
        let (catalog, index) = sample_index();
        let filters = SearchFilters::default().with_categories(["Development", "Animals"]);
        let expected = catalog.records().iter().filter(|r| filters.matches(r)).count();

        let result = search_similar("", &catalog, &index, &filters, 100).unwrap();
        assert_eq!(result.len(), expected);
        assert_eq!(result.total_matches, expected);
        assert!(result.len() <= catalog.len());
    }

    #[test]
    fn test_mismatched_index_is_rejected() {
        let (_, index) = sample_index();
        let mut records = sample_records();
        records.pop();
        let other = Catalog::from_records(records);

        let err = search_similar("weather", &other, &index, &SearchFilters::default(), 5)
            .unwrap_err();
        assert!(matches!(err, SearchError::IndexMismatch { .. }));
    }
}
