pub mod discovery_service;
pub mod start_grpc_server;

pub mod apifinder {
    tonic::include_proto!("apifinder");
}
