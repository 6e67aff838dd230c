//! In-memory catalog of API metadata and the loader that produces it.

mod loader;
mod record;
mod sample;

pub use loader::CatalogLoader;
pub use record::{ApiRecord, Cors};
pub use sample::sample_records;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use crate::constants::SAMPLE_NOTICE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    File(PathBuf),
    Sample,
    Inline,
}

impl fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogOrigin::File(path) => write!(f, "{}", path.display()),
            CatalogOrigin::Sample => f.write_str("built-in sample"),
            CatalogOrigin::Inline => f.write_str("inline"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total_apis: usize,
    pub total_categories: usize,
    pub categories: Vec<String>,
    pub auth_types: Vec<String>,
    pub origin: String,
    pub loaded_at: DateTime<Utc>,
    pub notice: Option<String>,
}

/// Ordered, read-only set of records. A record's identity is its position.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ApiRecord>,
    search_texts: Vec<String>,
    origin: CatalogOrigin,
    loaded_at: DateTime<Utc>,
    fingerprint: u64,
}

impl Catalog {
    pub fn new(records: Vec<ApiRecord>, origin: CatalogOrigin) -> Self {
        let search_texts: Vec<String> = records.iter().map(ApiRecord::search_text).collect();

        let mut hasher = DefaultHasher::new();
        search_texts.len().hash(&mut hasher);
        for text in &search_texts {
            text.hash(&mut hasher);
        }

        Self {
            records,
            search_texts,
            origin,
            loaded_at: Utc::now(),
            fingerprint: hasher.finish(),
        }
    }

    pub fn from_records(records: Vec<ApiRecord>) -> Self {
        Self::new(records, CatalogOrigin::Inline)
    }

    pub fn sample() -> Self {
        Self::new(sample_records(), CatalogOrigin::Sample)
    }

    pub fn records(&self) -> &[ApiRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&ApiRecord> {
        self.records.get(position)
    }

    pub fn search_texts(&self) -> &[String] {
        &self.search_texts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Informational message for the user; set only for the sample fallback.
    pub fn notice(&self) -> Option<&'static str> {
        match self.origin {
            CatalogOrigin::Sample => Some(SAMPLE_NOTICE),
            _ => None,
        }
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.category.as_str()))
    }

    pub fn auth_types(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.auth.as_str()))
    }

    pub fn stats(&self) -> CatalogStats {
        let categories = self.categories();
        CatalogStats {
            total_apis: self.len(),
            total_categories: categories.len(),
            categories,
            auth_types: self.auth_types(),
            origin: self.origin.to_string(),
            loaded_at: self.loaded_at,
            notice: self.notice().map(str::to_string),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
