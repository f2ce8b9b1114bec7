// ── Controller seam ──
//
// The engine talks to the controller only through `GatewayApi`, so tests
// can script responses and the real client stays a thin adapter.

use async_trait::async_trait;
use tracing::{debug, info};

use edgegw_api::{ControllerClient, CreateEdgeGatewayRequest, TlsMode, TransportConfig};

use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::convert::interface_records;
use crate::error::CoreError;
use crate::model::{EdgeGateway, RemoteGatewayView};

/// Remote operations on a single edge gateway.
///
/// None of these retry or wait. Success from `create` only means the
/// controller accepted the request.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn create(&self, gateway: &EdgeGateway) -> Result<(), CoreError>;

    /// One read. `CoreError::NotFound` is authoritative absence.
    async fn read(&self, name: &str) -> Result<RemoteGatewayView, CoreError>;

    /// Replace the remote interface collection with `gateway.interfaces`.
    async fn update(&self, gateway: &EdgeGateway) -> Result<(), CoreError>;

    async fn delete(&self, project_id: &str, device_id: &str, name: &str)
    -> Result<(), CoreError>;
}

#[async_trait]
impl GatewayApi for ControllerClient {
    async fn create(&self, gateway: &EdgeGateway) -> Result<(), CoreError> {
        let request = CreateEdgeGatewayRequest::from(gateway);
        Ok(self.create_edge_gateway(&request).await?)
    }

    async fn read(&self, name: &str) -> Result<RemoteGatewayView, CoreError> {
        let info = self.get_gateway_info(name).await?;
        Ok(RemoteGatewayView::from(info))
    }

    async fn update(&self, gateway: &EdgeGateway) -> Result<(), CoreError> {
        let records = interface_records(gateway);
        Ok(self.update_edge_gateway(&gateway.name, &records).await?)
    }

    async fn delete(
        &self,
        project_id: &str,
        device_id: &str,
        name: &str,
    ) -> Result<(), CoreError> {
        Ok(self
            .delete_edge_gateway(project_id, device_id, name)
            .await?)
    }
}

/// Build an authenticated client from runtime configuration.
pub async fn connect(config: &ControllerConfig) -> Result<ControllerClient, CoreError> {
    let transport = TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    };
    let client = ControllerClient::new(config.url.clone(), &transport)?;

    match &config.auth {
        AuthCredentials::Credentials { username, password } => {
            debug!(url = %client.base_url(), username, "logging in to controller");
            client.login(username, password).await?;
            info!(url = %client.base_url(), "authenticated with controller");
        }
        AuthCredentials::Cid(cid) => {
            debug!(url = %client.base_url(), "using pre-issued CID");
            client.set_cid(cid.clone());
        }
    }
    Ok(client)
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
