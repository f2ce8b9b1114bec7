// ── Domain model ──
//
// Canonical types for one edge gateway and its interfaces. Desired state
// is built once and passed by value; the remote view is replaced wholesale
// on every read and never merged into the desired side.

pub mod gateway;
pub mod remote;

pub use gateway::{AdminState, EdgeGateway, InterfaceConfig};
pub use remote::RemoteGatewayView;
