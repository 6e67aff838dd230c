use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

use crate::catalog::{Catalog, CatalogLoader};
use crate::errors::{CatalogError, SearchError};
use crate::filters::SearchFilters;
use crate::ranking::RankerIndex;
use crate::search_operations::{search_similar, QueryResult};

/// A catalog and the index derived from it. Never mutated after construction.
#[derive(Debug)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    index: RankerIndex,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, max_features: usize) -> Self {
        let index = RankerIndex::build(&catalog, max_features);
        info!(
            "Search engine ready: {} APIs, {} indexed terms",
            catalog.len(),
            index.vectorizer().vocabulary_size()
        );
        Self { catalog, index }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn index(&self) -> &RankerIndex {
        &self.index
    }

    pub fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<QueryResult, SearchError> {
        search_similar(query, &self.catalog, &self.index, filters, limit)
    }
}

/// Current engine, swapped whole on reload. Reloads run one at a time.
pub struct EngineHandle {
    loader: CatalogLoader,
    max_features: usize,
    current: RwLock<Arc<SearchEngine>>,
    reloading: Mutex<()>,
}

impl EngineHandle {
    pub fn open(loader: CatalogLoader, max_features: usize) -> Result<Self, CatalogError> {
        let catalog = loader.load()?;
        let engine = Arc::new(SearchEngine::new(catalog, max_features));
        Ok(Self {
            loader,
            max_features,
            current: RwLock::new(engine),
            reloading: Mutex::new(()),
        })
    }

    pub fn current(&self) -> Result<Arc<SearchEngine>, SearchError> {
        self.current
            .read()
            .map(|engine| Arc::clone(&engine))
            .map_err(|_| SearchError::LockPoisoned)
    }

    /// Re-read the catalog and build a new engine before publishing it.
    /// On failure the previous engine stays in place.
    pub fn reload(&self) -> anyhow::Result<Arc<SearchEngine>> {
        // Held until the new engine is published, so the last read wins.
        let _reloading = self
            .reloading
            .lock()
            .map_err(|_| SearchError::LockPoisoned)?;
        let catalog = self.loader.reload()?;
        let engine = Arc::new(SearchEngine::new(catalog, self.max_features));
        let mut current = self
            .current
            .write()
            .map_err(|_| SearchError::LockPoisoned)?;
        *current = Arc::clone(&engine);
        info!("Catalog reloaded from {}", self.loader.path().display());
        Ok(engine)
    }

    /// Blocks every reload while the guard lives.
    #[cfg(test)]
    pub(crate) fn pause_reloads(&self) -> std::sync::MutexGuard<'_, ()> {
        self.reloading
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
