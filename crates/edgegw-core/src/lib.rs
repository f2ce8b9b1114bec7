//! Desired-state model and reconciliation engine for edge gateways.
//!
//! This crate owns the business logic between `edgegw-api` and the CLI:
//!
//! - **Domain model** ([`model`]): [`EdgeGateway`] and its owned
//!   [`InterfaceConfig`] collection as immutable value objects, plus the
//!   read-only [`RemoteGatewayView`] the controller reports back.
//!
//! - **[`GatewayInput`]**: Deserializable raw declaration. Its
//!   [`build()`](GatewayInput::build) applies role-list defaults and
//!   validates ForceNew fields before anything reaches the engine.
//!
//! - **[`normalize`]**: Order-insensitive comparison of interface
//!   collections, the gate in front of every update.
//!
//! - **[`Reconciler`]**: Runs create / read / update / delete / import
//!   against any [`GatewayApi`]. Create submits, then waits for the
//!   controller to make the gateway visible under a bounded
//!   [`VisibilityPolicy`], then pushes the full interface list.
//!
//! - **[`ManagedGateway`]**: The caller's local mirror: the last applied
//!   declaration plus a tagged [`Binding`] recording how far the lifecycle
//!   has progressed.

pub mod builder;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use edgegw_api::ControllerClient;
pub use builder::{GatewayInput, InterfaceInput};
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use model::{AdminState, EdgeGateway, InterfaceConfig, RemoteGatewayView};
pub use reconcile::{
    Binding, GatewayApi, InterfaceDelta, ManagedGateway, Plan, ReadOutcome, Reconciler,
    VisibilityPolicy, connect, plan,
};
