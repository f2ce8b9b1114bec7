// Wire types for the edge gateway actions.
//
// Field names follow the controller's JSON exactly. Optional strings are
// sent as empty strings rather than omitted, matching what the
// controller's own tooling emits.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Standard response envelope: `{ "return": bool, "results": T, "reason": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(rename = "return")]
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub results: Option<T>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// One interface record as the controller stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePlatformInterface {
    pub ifname: String,
    #[serde(rename = "type")]
    pub if_type: String,
    #[serde(default)]
    pub public_ip: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub dhcp: bool,
    pub ipaddr: String,
    #[serde(default)]
    pub gateway_ip: String,
    #[serde(default)]
    pub dns_primary: String,
    #[serde(default)]
    pub dns_secondary: String,
    /// `"enabled"` or `"disabled"`.
    pub admin_state: String,
}

/// Payload for `create_edge_csp_gateway`.
#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CreateEdgeGatewayRequest {
    pub name: String,
    pub site_id: String,
    pub project_id: String,
    pub device_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dhcp: bool,
    /// Comma-joined interface names.
    pub wan_ifnames: String,
    pub lan_ifnames: String,
    pub mgmt_ifnames: String,
    pub lan_ip: String,
    /// Not managed here; the controller still expects the key, empty.
    pub local_as_number: String,
    /// Not managed here; sent empty like `local_as_number`.
    pub wan_discovery_ip: String,
    pub no_progress_bar: bool,
    pub interfaces: Vec<EdgePlatformInterface>,
}

/// Payload for `update_edge_gateway`.
///
/// The interface list travels as base64-encoded JSON in a single field.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateEdgeGatewayRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<String>,
}

impl UpdateEdgeGatewayRequest {
    /// Build the request, encoding `interfaces` only when non-empty.
    pub fn new(name: &str, interfaces: &[EdgePlatformInterface]) -> Result<Self, Error> {
        let interfaces = if interfaces.is_empty() {
            None
        } else {
            let json = serde_json::to_vec(interfaces).map_err(|e| Error::Encoding {
                action: crate::edge::UPDATE_ACTION.into(),
                message: e.to_string(),
            })?;
            Some(STANDARD.encode(json))
        };
        Ok(Self {
            name: name.to_owned(),
            interfaces,
        })
    }
}

/// Payload for `delete_edge_csp_gateway`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteEdgeGatewayRequest {
    pub project_id: String,
    pub device_id: String,
    pub name: String,
}

/// Query for `get_gateway_info`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GatewayInfoQuery<'a> {
    pub gateway_name: &'a str,
}

/// `results` of `get_gateway_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeGatewayInfo {
    pub name: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub vpc_state: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
