use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{ApiRecord, Cors};

/// Conjunctive attribute filters. Every dimension defaults to "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Allowed categories; empty accepts any.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Allowed auth types; empty accepts any.
    #[serde(default)]
    pub auth_types: BTreeSet<String>,
    #[serde(default)]
    pub https_only: bool,
    #[serde(default)]
    pub cors_yes: bool,
}

impl SearchFilters {
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.extend(categories.into_iter().map(Into::into));
        self
    }

    pub fn with_auth_types<I, S>(mut self, auth_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_types.extend(auth_types.into_iter().map(Into::into));
        self
    }

    pub fn https_only(mut self, value: bool) -> Self {
        self.https_only = value;
        self
    }

    pub fn cors_yes(mut self, value: bool) -> Self {
        self.cors_yes = value;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.auth_types.is_empty() && !self.https_only && !self.cors_yes
    }

    pub fn matches(&self, record: &ApiRecord) -> bool {
        let SearchFilters {
            categories,
            auth_types,
            https_only,
            cors_yes,
        } = self;

        (categories.is_empty() || categories.contains(&record.category))
            && (auth_types.is_empty() || auth_types.contains(&record.auth))
            && (!https_only || record.https)
            && (!cors_yes || record.cors == Cors::Yes)
    }
}
