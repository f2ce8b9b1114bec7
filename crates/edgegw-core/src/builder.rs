// ── Desired-state builder ──
//
// Raw declaration as a user writes it (TOML / YAML / JSON), and the one
// place defaults and validation are applied. Field names follow the
// controller's vocabulary so declarations read like the wire format.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AdminState, EdgeGateway, InterfaceConfig};

pub const DEFAULT_WAN_IFNAME: &str = "eth0";
pub const DEFAULT_LAN_IFNAME: &str = "eth1";
pub const DEFAULT_MGMT_IFNAME: &str = "eth2";

/// A gateway declaration before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayInput {
    pub name: String,
    pub site_id: String,
    pub project_id: String,
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan_ifnames: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lan_ifnames: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_ifnames: Option<Vec<String>>,
    pub lan_ip: String,
    #[serde(default)]
    pub dhcp: bool,
    #[serde(default)]
    pub interfaces: Vec<InterfaceInput>,
}

/// An interface declaration before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceInput {
    pub ifname: String,
    #[serde(rename = "type")]
    pub if_type: String,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub dhcp: bool,
    pub ipaddr: String,
    #[serde(default)]
    pub gateway_ip: Option<String>,
    #[serde(default)]
    pub dns_primary: Option<String>,
    #[serde(default)]
    pub dns_secondary: Option<String>,
    #[serde(default)]
    pub admin_state: bool,
}

impl GatewayInput {
    /// Validate and convert into the desired-state entity.
    pub fn build(self) -> Result<EdgeGateway, CoreError> {
        let name = required("name", self.name)?;
        let site_id = required("site_id", self.site_id)?;
        let project_id = required("project_id", self.project_id)?;
        let device_id = required("device_id", self.device_id)?;
        let management_ip = required("lan_ip", self.lan_ip)?;

        let wan_interfaces = role_list("wan_ifnames", self.wan_ifnames, DEFAULT_WAN_IFNAME)?;
        let lan_interfaces = role_list("lan_ifnames", self.lan_ifnames, DEFAULT_LAN_IFNAME)?;
        let mgmt_interfaces = role_list("mgmt_ifnames", self.mgmt_ifnames, DEFAULT_MGMT_IFNAME)?;

        let interfaces = self
            .interfaces
            .into_iter()
            .enumerate()
            .map(|(idx, input)| input.build(idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EdgeGateway {
            name,
            site_id,
            project_id,
            device_id,
            wan_interfaces,
            lan_interfaces,
            mgmt_interfaces,
            management_ip,
            dhcp: self.dhcp,
            interfaces,
        })
    }
}

impl InterfaceInput {
    fn build(self, idx: usize) -> Result<InterfaceConfig, CoreError> {
        let field = |f: &str| format!("interfaces[{idx}].{f}");
        Ok(InterfaceConfig {
            name: required(&field("ifname"), self.ifname)?,
            interface_type: required(&field("type"), self.if_type)?,
            public_ip: optional(self.public_ip),
            tag: optional(self.tag),
            dhcp: self.dhcp,
            ip_address: required(&field("ipaddr"), self.ipaddr)?,
            gateway_ip: optional(self.gateway_ip),
            dns_primary: optional(self.dns_primary),
            dns_secondary: optional(self.dns_secondary),
            admin_state: AdminState::from(self.admin_state),
        })
    }
}

impl From<&EdgeGateway> for GatewayInput {
    fn from(gw: &EdgeGateway) -> Self {
        Self {
            name: gw.name.clone(),
            site_id: gw.site_id.clone(),
            project_id: gw.project_id.clone(),
            device_id: gw.device_id.clone(),
            wan_ifnames: Some(gw.wan_interfaces.clone()),
            lan_ifnames: Some(gw.lan_interfaces.clone()),
            mgmt_ifnames: Some(gw.mgmt_interfaces.clone()),
            lan_ip: gw.management_ip.clone(),
            dhcp: gw.dhcp,
            interfaces: gw
                .interfaces
                .iter()
                .map(|i| InterfaceInput {
                    ifname: i.name.clone(),
                    if_type: i.interface_type.clone(),
                    public_ip: i.public_ip.clone(),
                    tag: i.tag.clone(),
                    dhcp: i.dhcp,
                    ipaddr: i.ip_address.clone(),
                    gateway_ip: i.gateway_ip.clone(),
                    dns_primary: i.dns_primary.clone(),
                    dns_secondary: i.dns_secondary.clone(),
                    admin_state: i.admin_state.is_enabled(),
                })
                .collect(),
        }
    }
}

fn required(field: &str, value: String) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{field} must not be empty"),
        });
    }
    Ok(if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    })
}

/// Blank optional strings are the same as absent ones.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn role_list(
    field: &str,
    value: Option<Vec<String>>,
    default: &str,
) -> Result<Vec<String>, CoreError> {
    let Some(names) = value else {
        return Ok(vec![default.to_owned()]);
    };
    if names.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{field} must list at least one interface"),
        });
    }
    names
        .into_iter()
        .enumerate()
        .map(|(idx, n)| required(&format!("{field}[{idx}]"), n))
        .collect()
}
