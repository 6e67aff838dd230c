use crate::catalog::CatalogStats;
use crate::config::Config;
use crate::engine::EngineHandle;
use crate::filters::SearchFilters;
use crate::search_operations::ScoredRecord;
use crate::tester::{test_endpoint, HttpTransport, TestResponse};

use super::apifinder::discovery_server::Discovery;
use super::apifinder::test_endpoint_response::Outcome;
use super::apifinder::{
    ApiMatch, ReloadRequest, SearchRequest, SearchResponse, StatsRequest, StatsResponse,
    TestEndpointRequest, TestEndpointResponse, TestSuccess,
};

use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{error, info, warn};

pub struct DiscoveryService {
    config: Arc<Config>,
    engine: Arc<EngineHandle>,
    transport: Arc<dyn HttpTransport>,
}

impl DiscoveryService {
    pub fn new(
        config: Arc<Config>,
        engine: Arc<EngineHandle>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            engine,
            transport,
        }
    }

    fn convert_hit(hit: &ScoredRecord) -> ApiMatch {
        let record = &hit.record;
        ApiMatch {
            position: u32::try_from(hit.position).unwrap_or(u32::MAX),
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            auth: record.auth.clone(),
            https: record.https,
            cors: record.cors.to_string(),
            link: record.link.clone(),
            score: hit.score,
        }
    }

    fn convert_stats(stats: CatalogStats) -> StatsResponse {
        StatsResponse {
            total_apis: u32::try_from(stats.total_apis).unwrap_or(u32::MAX),
            total_categories: u32::try_from(stats.total_categories).unwrap_or(u32::MAX),
            categories: stats.categories,
            auth_types: stats.auth_types,
            origin: stats.origin,
            loaded_at: stats.loaded_at.to_rfc3339(),
            notice: stats.notice.unwrap_or_default(),
        }
    }

    fn convert_test_response(response: TestResponse) -> TestSuccess {
        TestSuccess {
            status: u32::from(response.status),
            headers: response.headers.into_iter().collect(),
            body: response.body,
            truncated: response.truncated,
            elapsed_ms: response.elapsed_ms,
        }
    }
}

#[tonic::async_trait]
impl Discovery for DiscoveryService {
    async fn search(
        &self,
        request: Request<SearchRequest>,
    ) -> Result<Response<SearchResponse>, Status> {
        let req = request.into_inner();
        info!(
            "Received search request - query: {:?}, categories: {:?}, auth_types: {:?}, limit: {}",
            req.query, req.categories, req.auth_types, req.limit
        );

        let limit = match req.limit {
            0 => self.config.search.default_limit,
            n => n as usize,
        };
        let filters = SearchFilters::default()
            .with_categories(req.categories)
            .with_auth_types(req.auth_types)
            .https_only(req.https_only)
            .cors_yes(req.cors_yes);

        let engine = self
            .engine
            .current()
            .map_err(|e| Status::internal(e.to_string()))?;
        let result = engine.search(&req.query, &filters, limit).map_err(|e| {
            error!("Search failed: {}", e);
            Status::internal(format!("Search failed: {}", e))
        })?;

        if result.is_empty() {
            warn!("No matches found for query: {:?}", req.query);
        }
        info!(
            "Returning {} of {} matches, best score: {:.3}",
            result.len(),
            result.total_matches,
            result.best_score()
        );

        Ok(Response::new(SearchResponse {
            matches: result.hits.iter().map(Self::convert_hit).collect(),
            total_matches: u32::try_from(result.total_matches).unwrap_or(u32::MAX),
        }))
    }

    async fn test_endpoint(
        &self,
        request: Request<TestEndpointRequest>,
    ) -> Result<Response<TestEndpointResponse>, Status> {
        let req = request.into_inner();
        info!("Received test request - {} {}", req.method, req.url);

        let outcome = match test_endpoint(
            self.transport.as_ref(),
            &self.config.tester,
            &req.method,
            &req.url,
            &req.headers,
            &req.body,
        )
        .await
        {
            Ok(response) => Outcome::Success(Self::convert_test_response(response)),
            Err(e) => Outcome::Error(e.to_string()),
        };

        Ok(Response::new(TestEndpointResponse {
            outcome: Some(outcome),
        }))
    }

    async fn stats(
        &self,
        _request: Request<StatsRequest>,
    ) -> Result<Response<StatsResponse>, Status> {
        let engine = self
            .engine
            .current()
            .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Self::convert_stats(engine.catalog().stats())))
    }

    async fn reload(
        &self,
        _request: Request<ReloadRequest>,
    ) -> Result<Response<StatsResponse>, Status> {
        info!("Received reload request");
        let handle = Arc::clone(&self.engine);
        let engine = tokio::task::spawn_blocking(move || handle.reload())
            .await
            .map_err(|e| {
                error!("Reload task failed: {}", e);
                Status::internal(format!("Reload task failed: {}", e))
            })?
            .map_err(|e| {
                error!("Reload failed: {}", e);
                Status::internal(format!("Reload failed: {}", e))
            })?;
        Ok(Response::new(Self::convert_stats(engine.catalog().stats())))
    }
}

