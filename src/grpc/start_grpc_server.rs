use crate::config::Config;
use crate::engine::EngineHandle;
use crate::health::health::health_server::HealthServer;
use crate::health::HealthService;
use crate::tester::HttpTransport;

use super::apifinder::discovery_server::DiscoveryServer;
use super::discovery_service::DiscoveryService;

use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tonic_reflection::server::Builder as ReflectionBuilder;
use tracing::{error, info};

pub async fn start_grpc_server(
    config: Arc<Config>,
    engine: Arc<EngineHandle>,
    transport: Arc<dyn HttpTransport>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = match config.server.address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid server address {:?}: {}", config.server.address, e);
            return Err(e.into());
        }
    };

    let discovery_service = DiscoveryService::new(Arc::clone(&config), Arc::clone(&engine), transport);
    let health_service = HealthService::new(engine);

    // Get the file descriptor set
    let descriptor_set = include_bytes!(concat!(env!("OUT_DIR"), "/apifinder_descriptor.bin"));

    // Build the reflection service
    let reflection_service = ReflectionBuilder::configure()
        .register_encoded_file_descriptor_set(descriptor_set)
        .build_v1()?;

    info!("Starting gRPC server on {}", addr);

    Server::builder()
        .add_service(DiscoveryServer::new(discovery_service))
        .add_service(HealthServer::new(health_service))
        .add_service(reflection_service)
        .serve(addr)
        .await?;

    info!("gRPC server has been shut down");
    Ok(())
}
