use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported catalog format {0:?} (expected .csv, .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Index was built for catalog {index:016x} but searched against {catalog:016x}")]
    IndexMismatch { index: u64, catalog: u64 },
    #[error("Engine lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("Unsupported method {0:?} (expected GET, POST, PUT or DELETE)")]
    UnsupportedMethod(String),
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Headers are not valid JSON: {0}")]
    MalformedHeaders(String),
    #[error("Body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Request failed: {0}")]
    Network(String),
}

impl RequestError {
    /// True for errors raised before anything was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RequestError::UnsupportedMethod(_)
                | RequestError::InvalidUrl { .. }
                | RequestError::MalformedHeaders(_)
                | RequestError::MalformedBody(_)
        )
    }
}
