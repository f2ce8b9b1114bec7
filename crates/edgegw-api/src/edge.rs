// Edge gateway endpoints
//
// Thin wrappers over the action primitives. None of these retry or wait;
// visibility polling is the caller's concern.

use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::{
    CreateEdgeGatewayRequest, DeleteEdgeGatewayRequest, EdgeGatewayInfo, EdgePlatformInterface,
    GatewayInfoQuery, UpdateEdgeGatewayRequest,
};

pub const CREATE_ACTION: &str = "create_edge_csp_gateway";
pub const READ_ACTION: &str = "get_gateway_info";
pub const UPDATE_ACTION: &str = "update_edge_gateway";
pub const DELETE_ACTION: &str = "delete_edge_csp_gateway";

impl ControllerClient {
    /// Submit a gateway for provisioning.
    ///
    /// Success means the controller accepted the request, not that the
    /// gateway exists yet.
    pub async fn create_edge_gateway(&self, request: &CreateEdgeGatewayRequest) -> Result<(), Error> {
        debug!(name = %request.name, site = %request.site_id, "creating edge gateway");
        self.invoke(CREATE_ACTION, request).await
    }

    /// Fetch the controller's view of a gateway, once.
    pub async fn get_gateway_info(&self, name: &str) -> Result<EdgeGatewayInfo, Error> {
        debug!(name, "reading edge gateway");
        self.invoke_and_decode(READ_ACTION, &GatewayInfoQuery { gateway_name: name })
            .await
    }

    /// Replace the gateway's interface list wholesale.
    pub async fn update_edge_gateway(
        &self,
        name: &str,
        interfaces: &[EdgePlatformInterface],
    ) -> Result<(), Error> {
        debug!(name, count = interfaces.len(), "updating edge gateway interfaces");
        let request = UpdateEdgeGatewayRequest::new(name, interfaces)?;
        self.invoke(UPDATE_ACTION, &request).await
    }

    /// Delete a gateway, keyed by project, device and name.
    pub async fn delete_edge_gateway(
        &self,
        project_id: &str,
        device_id: &str,
        name: &str,
    ) -> Result<(), Error> {
        debug!(project_id, device_id, name, "deleting edge gateway");
        let request = DeleteEdgeGatewayRequest {
            project_id: project_id.to_owned(),
            device_id: device_id.to_owned(),
            name: name.to_owned(),
        };
        self.invoke(DELETE_ACTION, &request).await
    }
}
