use crate::engine::EngineHandle;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::warn;

pub mod health {
    tonic::include_proto!("grpc.health.v1");
}

use health::health_check_response::ServingStatus;
use health::health_server::Health;
use health::{HealthCheckRequest, HealthCheckResponse};

#[derive(Clone)]
pub struct HealthService {
    engine: Arc<EngineHandle>,
}

impl HealthService {
    pub fn new(engine: Arc<EngineHandle>) -> Self {
        Self { engine }
    }
}

#[tonic::async_trait]
impl Health for HealthService {
    async fn check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        // Serving as long as a search engine can be handed out
        match self.engine.current() {
            Ok(_) => Ok(Response::new(HealthCheckResponse {
                status: ServingStatus::Serving as i32,
            })),
            Err(e) => {
                warn!("Health check failed: {}", e);
                Ok(Response::new(HealthCheckResponse {
                    status: ServingStatus::NotServing as i32,
                }))
            }
        }
    }
}
