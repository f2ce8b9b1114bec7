// ── API-to-domain type conversions ──
//
// Bridges raw `edgegw_api` wire types into canonical domain types and
// back. Optional domain strings become empty wire strings; role lists
// are comma-joined.

use chrono::Utc;

use edgegw_api::{CreateEdgeGatewayRequest, EdgeGatewayInfo, EdgePlatformInterface};

use crate::model::{EdgeGateway, InterfaceConfig, RemoteGatewayView};

impl From<&InterfaceConfig> for EdgePlatformInterface {
    fn from(i: &InterfaceConfig) -> Self {
        Self {
            ifname: i.name.clone(),
            if_type: i.interface_type.clone(),
            public_ip: i.public_ip.clone().unwrap_or_default(),
            tag: i.tag.clone().unwrap_or_default(),
            dhcp: i.dhcp,
            ipaddr: i.ip_address.clone(),
            gateway_ip: i.gateway_ip.clone().unwrap_or_default(),
            dns_primary: i.dns_primary.clone().unwrap_or_default(),
            dns_secondary: i.dns_secondary.clone().unwrap_or_default(),
            admin_state: i.admin_state.to_string(),
        }
    }
}

/// Wire records for a gateway's full interface list.
pub fn interface_records(gateway: &EdgeGateway) -> Vec<EdgePlatformInterface> {
    gateway
        .interfaces
        .iter()
        .map(EdgePlatformInterface::from)
        .collect()
}

impl From<&EdgeGateway> for CreateEdgeGatewayRequest {
    fn from(gw: &EdgeGateway) -> Self {
        Self {
            name: gw.name.clone(),
            site_id: gw.site_id.clone(),
            project_id: gw.project_id.clone(),
            device_id: gw.device_id.clone(),
            dhcp: gw.dhcp,
            wan_ifnames: gw.wan_interfaces.join(","),
            lan_ifnames: gw.lan_interfaces.join(","),
            mgmt_ifnames: gw.mgmt_interfaces.join(","),
            lan_ip: gw.management_ip.clone(),
            local_as_number: String::new(),
            wan_discovery_ip: String::new(),
            no_progress_bar: true,
            interfaces: interface_records(gw),
        }
    }
}

impl From<EdgeGatewayInfo> for RemoteGatewayView {
    fn from(info: EdgeGatewayInfo) -> Self {
        // Older controllers only report the VPC the gateway was placed in.
        let site_id = info
            .site_id
            .filter(|s| !s.is_empty())
            .or_else(|| info.vpc_id.clone());
        Self {
            name: info.name,
            site_id,
            vpc_id: info.vpc_id,
            vpc_state: info.vpc_state,
            status: info.status,
            observed_at: Utc::now(),
        }
    }
}
