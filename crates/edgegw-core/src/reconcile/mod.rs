// ── Reconciliation engine ──
//
// Drives one gateway through create / read / update / delete / import.
// `binding` is the lifecycle record, `plan` the change classification,
// `remote` the seam to the controller and `engine` the orchestration.

mod binding;
mod engine;
mod plan;
mod policy;
mod remote;

pub use binding::{Binding, ManagedGateway};
pub use engine::{ReadOutcome, Reconciler};
pub use plan::{Plan, plan};
pub use policy::VisibilityPolicy;
pub use remote::{GatewayApi, connect};

pub use crate::normalize::InterfaceDelta;
