pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod display;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod grpc;
pub mod health;
pub mod preprocessing;
pub mod ranking;
pub mod search_operations;
pub mod tester;

#[cfg(test)]
mod tests;
// Re-export everything that main.rs needs
pub use catalog::{ApiRecord, Catalog, CatalogLoader, CatalogOrigin, CatalogStats, Cors};
pub use cli::parse_args;
pub use config::Config;
pub use constants::*;
pub use engine::{EngineHandle, SearchEngine};
pub use errors::{CatalogError, RequestError, SearchError};
pub use filters::SearchFilters;
pub use grpc::start_grpc_server::start_grpc_server;
pub use ranking::RankerIndex;
pub use search_operations::{search_similar, QueryResult, ScoredRecord};
pub use tester::{test_endpoint, HttpMethod, HttpTransport, ReqwestTransport, TestResponse};
