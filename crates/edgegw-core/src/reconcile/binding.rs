// ── Lifecycle binding ──
//
// The local mirror of one gateway: the last accepted declaration plus how
// far the remote lifecycle has progressed. Only the engine moves a binding
// between phases.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::model::{EdgeGateway, RemoteGatewayView};

/// Where a gateway sits in its remote lifecycle.
///
/// `Submitted` is indeterminate: the create call may or may not have taken
/// effect on the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(tag = "phase", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Binding {
    /// No identity assigned; nothing has been sent.
    #[default]
    Unbound,
    /// Identity assigned and create attempted.
    Submitted { name: String },
    /// Create accepted; polling for the read path to catch up.
    AwaitingVisibility { name: String, attempts: u64 },
    /// Readable, interfaces not yet pushed.
    Visible {
        name: String,
        view: RemoteGatewayView,
    },
    /// Readable and configured.
    Reconciled {
        name: String,
        view: RemoteGatewayView,
    },
    /// Deleted. Terminal.
    Destroyed { name: String },
}

impl Binding {
    /// Remote identity, if one has been assigned and not yet retired.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Unbound | Self::Destroyed { .. } => None,
            Self::Submitted { name }
            | Self::AwaitingVisibility { name, .. }
            | Self::Visible { name, .. }
            | Self::Reconciled { name, .. } => Some(name),
        }
    }

    /// Last remote view, if the gateway has been observed.
    pub fn view(&self) -> Option<&RemoteGatewayView> {
        match self {
            Self::Visible { view, .. } | Self::Reconciled { view, .. } => Some(view),
            _ => None,
        }
    }

    /// Phase name, for logs and error messages.
    pub fn phase(&self) -> &'static str {
        self.into()
    }
}

/// The caller-owned record for one gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedGateway {
    desired: EdgeGateway,
    #[serde(default)]
    binding: Binding,
}

impl ManagedGateway {
    /// A gateway that has not been sent anywhere yet.
    pub fn new(desired: EdgeGateway) -> Self {
        Self {
            desired,
            binding: Binding::Unbound,
        }
    }

    pub fn desired(&self) -> &EdgeGateway {
        &self.desired
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Drop a provisional identity left behind by a failed create.
    ///
    /// Only a `Submitted` binding is discardable; anything further along
    /// refers to an object the controller is known to hold.
    pub fn discard(&mut self) -> bool {
        if matches!(self.binding, Binding::Submitted { .. }) {
            self.binding = Binding::Unbound;
            true
        } else {
            false
        }
    }

    pub(crate) fn bind(&mut self, binding: Binding) {
        self.binding = binding;
    }

    pub(crate) fn clear_identity(&mut self) {
        self.binding = Binding::Unbound;
    }

    pub(crate) fn set_desired(&mut self, desired: EdgeGateway) {
        self.desired = desired;
    }
}
