use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the controller reports for a gateway.
///
/// Display-only apart from `name` and `site_id`, which import may copy
/// into the declaration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGatewayView {
    pub name: String,
    pub site_id: Option<String>,
    pub vpc_id: Option<String>,
    pub vpc_state: Option<String>,
    pub status: Option<String>,
    /// When this view was read.
    pub observed_at: DateTime<Utc>,
}
