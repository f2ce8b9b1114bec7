// ── Change classification ──
//
// Compares a new declaration against the one the mirror last accepted and
// decides what, if anything, must happen remotely.

use serde::Serialize;

use crate::model::EdgeGateway;
use crate::normalize::{self, InterfaceDelta};

/// What applying a declaration would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    /// Nothing exists yet; submit and wait for visibility.
    Create,
    /// Declarations are equivalent.
    Unchanged,
    /// Only fields the controller never receives on update differ.
    StateOnly { fields: Vec<&'static str> },
    /// The interface collection changed; push it wholesale.
    UpdateInterfaces { delta: InterfaceDelta },
    /// An immutable field changed; only destroy-and-create can realize it.
    Replace { fields: Vec<&'static str> },
}

impl Plan {
    /// Whether carrying out this plan issues an update call.
    pub fn requires_remote_update(&self) -> bool {
        matches!(self, Self::UpdateInterfaces { .. })
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        match self {
            Self::Create => "create".into(),
            Self::Unchanged => "no changes".into(),
            Self::StateOnly { fields } => format!("local fields only: {}", fields.join(", ")),
            Self::UpdateInterfaces { delta } => format!(
                "update interfaces (+{} -{} ~{})",
                delta.added.len(),
                delta.removed.len(),
                delta.modified.len()
            ),
            Self::Replace { fields } => format!("replace (changed: {})", fields.join(", ")),
        }
    }
}

/// Classify `desired` against the last accepted declaration.
///
/// A ForceNew difference wins over everything else. Interface changes are
/// judged on the normalized collections, so reordering alone is
/// `Unchanged`.
pub fn plan(current: Option<&EdgeGateway>, desired: &EdgeGateway) -> Plan {
    let Some(current) = current else {
        return Plan::Create;
    };

    let replaced = force_new_changes(current, desired);
    if !replaced.is_empty() {
        return Plan::Replace { fields: replaced };
    }

    if !normalize::equivalent(&current.interfaces, &desired.interfaces) {
        return Plan::UpdateInterfaces {
            delta: InterfaceDelta::between(&current.interfaces, &desired.interfaces),
        };
    }

    let local = state_only_changes(current, desired);
    if local.is_empty() {
        Plan::Unchanged
    } else {
        Plan::StateOnly { fields: local }
    }
}

fn force_new_changes(old: &EdgeGateway, new: &EdgeGateway) -> Vec<&'static str> {
    let checks = [
        ("name", old.name == new.name),
        ("site_id", old.site_id == new.site_id),
        ("project_id", old.project_id == new.project_id),
        ("device_id", old.device_id == new.device_id),
        ("wan_ifnames", old.wan_interfaces == new.wan_interfaces),
        ("lan_ifnames", old.lan_interfaces == new.lan_interfaces),
        ("mgmt_ifnames", old.mgmt_interfaces == new.mgmt_interfaces),
    ];
    checks
        .into_iter()
        .filter(|(_, same)| !same)
        .map(|(field, _)| field)
        .collect()
}

fn state_only_changes(old: &EdgeGateway, new: &EdgeGateway) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.management_ip != new.management_ip {
        fields.push("lan_ip");
    }
    if old.dhcp != new.dhcp {
        fields.push("dhcp");
    }
    fields
}
