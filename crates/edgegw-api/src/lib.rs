// edgegw-api: Async Rust client for the edge platform controller's action API

pub mod client;
pub mod edge;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ControllerClient;
pub use error::Error;
pub use models::{
    CreateEdgeGatewayRequest, DeleteEdgeGatewayRequest, EdgeGatewayInfo, EdgePlatformInterface,
    UpdateEdgeGatewayRequest,
};
pub use transport::{TlsMode, TransportConfig};
