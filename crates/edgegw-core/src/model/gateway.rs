// ── Desired-state entities ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Administrative state of an interface.
///
/// Declared as a boolean; the controller only understands the two
/// lowercase literals.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdminState {
    Enabled,
    #[default]
    Disabled,
}

impl AdminState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<bool> for AdminState {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// One interface owned by an [`EdgeGateway`].
///
/// `name` keys the interface within its parent. Uniqueness is assumed,
/// not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub name: String,
    /// Role tag, e.g. `WAN`, `LAN`, `MANAGEMENT`.
    pub interface_type: String,
    pub public_ip: Option<String>,
    pub tag: Option<String>,
    pub dhcp: bool,
    pub ip_address: String,
    pub gateway_ip: Option<String>,
    pub dns_primary: Option<String>,
    pub dns_secondary: Option<String>,
    pub admin_state: AdminState,
}

/// Desired state for a single edge gateway.
///
/// Everything except `interfaces`, `management_ip` and `dhcp` is
/// ForceNew: a change means destroy and recreate, never an in-place
/// update. Only `interfaces` is ever sent on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeGateway {
    /// Remote resource key for every call after create.
    pub name: String,
    pub site_id: String,
    pub project_id: String,
    pub device_id: String,
    pub wan_interfaces: Vec<String>,
    pub lan_interfaces: Vec<String>,
    pub mgmt_interfaces: Vec<String>,
    /// Management-interface address.
    pub management_ip: String,
    /// DHCP (true) or static (false) addressing for management.
    pub dhcp: bool,
    pub interfaces: Vec<InterfaceConfig>,
}
