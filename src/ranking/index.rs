use tracing::debug;

use super::vectorizer::{cosine_similarity, SparseVector, TfidfVectorizer};
use crate::catalog::Catalog;
use crate::errors::SearchError;
use crate::preprocessing::tokenize;

/// Vectorizer fitted over one catalog plus that catalog's row vectors.
#[derive(Debug, Clone)]
pub struct RankerIndex {
    vectorizer: TfidfVectorizer,
    vectors: Vec<SparseVector>,
    catalog_fingerprint: u64,
}

impl RankerIndex {
    pub fn build(catalog: &Catalog, max_features: usize) -> Self {
        let documents: Vec<Vec<String>> = catalog
            .search_texts()
            .iter()
            .map(|text| tokenize(text))
            .collect();

        let vectorizer = TfidfVectorizer::fit(&documents, max_features);
        let vectors = documents
            .iter()
            .map(|tokens| vectorizer.transform(tokens))
            .collect();

        debug!(
            "Built index over {} records with {} terms",
            catalog.len(),
            vectorizer.vocabulary_size()
        );

        Self {
            vectorizer,
            vectors,
            catalog_fingerprint: catalog.fingerprint(),
        }
    }

    pub fn catalog_fingerprint(&self) -> u64 {
        self.catalog_fingerprint
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn ensure_matches(&self, catalog: &Catalog) -> Result<(), SearchError> {
        if self.catalog_fingerprint != catalog.fingerprint() || self.vectors.len() != catalog.len() {
            return Err(SearchError::IndexMismatch {
                index: self.catalog_fingerprint,
                catalog: catalog.fingerprint(),
            });
        }
        Ok(())
    }

    /// One score per record, in catalog order.
    pub fn score(&self, terms: &[String]) -> Vec<f64> {
        let query = self.vectorizer.transform(terms);
        if query.is_zero() {
            return vec![0.0; self.vectors.len()];
        }
        self.vectors
            .iter()
            .map(|row| cosine_similarity(&query, row))
            .collect()
    }
}
