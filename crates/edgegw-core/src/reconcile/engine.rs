// ── Reconciler ──
//
// Orchestrates the gateway lifecycle against a `GatewayApi`. Every
// operation takes the mirror by `&mut`, so one gateway never has two
// operations in flight. The only suspension point with its own timing is
// the visibility wait after create.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{EdgeGateway, RemoteGatewayView};

use super::binding::{Binding, ManagedGateway};
use super::plan::{Plan, plan};
use super::policy::VisibilityPolicy;
use super::remote::GatewayApi;

/// Shortest poll period the wait loop will run with.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Result of a steady-state read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The controller reported the gateway; the mirror holds this view.
    Present(RemoteGatewayView),
    /// The controller says it is gone; the mirror's identity was cleared.
    Absent,
}

/// Runs lifecycle operations for edge gateways against one controller.
pub struct Reconciler<A> {
    api: A,
    policy: VisibilityPolicy,
}

impl<A: GatewayApi> Reconciler<A> {
    pub fn new(api: A, policy: VisibilityPolicy) -> Self {
        Self { api, policy }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn policy(&self) -> &VisibilityPolicy {
        &self.policy
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Submit, wait for visibility, push interfaces, then refresh.
    ///
    /// Failure leaves the mirror wherever the lifecycle stopped:
    /// `Submitted` if the create call or the wait failed, `Visible` if the
    /// gateway exists but its interfaces could not be pushed.
    pub async fn create(
        &self,
        gateway: &mut ManagedGateway,
        cancel: &CancellationToken,
    ) -> Result<RemoteGatewayView, CoreError> {
        if !matches!(gateway.binding(), Binding::Unbound) {
            return Err(CoreError::InvalidState {
                operation: "create",
                state: gateway.binding().phase(),
            });
        }

        let name = gateway.desired().name.clone();
        gateway.bind(Binding::Submitted { name: name.clone() });
        info!(name = %name, site = %gateway.desired().site_id, "submitting edge gateway");

        self.api.create(gateway.desired()).await?;
        debug!(name = %name, "create accepted");

        self.await_visibility(gateway, cancel).await?;

        // Visible, but the controller has not seen the interface list yet.
        self.api.update(gateway.desired()).await?;
        debug!(name = %name, count = gateway.desired().interfaces.len(), "interfaces pushed");

        let view = self.api.read(&name).await?;
        gateway.bind(Binding::Reconciled {
            name: name.clone(),
            view: view.clone(),
        });
        info!(name = %name, "edge gateway reconciled");
        Ok(view)
    }

    /// Poll until the submitted gateway is readable.
    ///
    /// The first read happens one interval after entry. Not-found and
    /// transient failures both mean "try again", since the controller
    /// answers the same way while provisioning is still running. A failed
    /// provisioning run is therefore only noticed when the budget expires.
    pub async fn await_visibility(
        &self,
        gateway: &mut ManagedGateway,
        cancel: &CancellationToken,
    ) -> Result<RemoteGatewayView, CoreError> {
        let name = match gateway.binding() {
            Binding::Submitted { name } | Binding::AwaitingVisibility { name, .. } => name.clone(),
            other => {
                return Err(CoreError::InvalidState {
                    operation: "wait for",
                    state: other.phase(),
                });
            }
        };

        let period = self.policy.interval.max(MIN_POLL_INTERVAL);
        let deadline = tokio::time::sleep(self.policy.budget);
        tokio::pin!(deadline);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            name = %name,
            interval_secs = period.as_secs_f64(),
            budget_secs = self.policy.budget.as_secs(),
            max_attempts = self.policy.max_attempts(),
            "waiting for edge gateway to become visible"
        );
        let mut attempts: u64 = 0;
        gateway.bind(Binding::AwaitingVisibility {
            name: name.clone(),
            attempts,
        });

        let outcome = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break Err(self.cancelled(&name)),
                () = &mut deadline => break Err(self.timed_out(&name)),
                _ = ticker.tick() => {}
            }

            attempts += 1;
            gateway.bind(Binding::AwaitingVisibility {
                name: name.clone(),
                attempts,
            });

            let read = tokio::select! {
                biased;
                () = cancel.cancelled() => break Err(self.cancelled(&name)),
                () = &mut deadline => break Err(self.timed_out(&name)),
                read = self.api.read(&name) => read,
            };

            match read {
                Ok(view) => break Ok(view),
                Err(e) if e.is_retryable() => {
                    debug!(name = %name, attempt = attempts, error = %e, "gateway not visible yet");
                }
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(view) => {
                info!(name = %name, attempts, "edge gateway visible");
                gateway.bind(Binding::Visible {
                    name,
                    view: view.clone(),
                });
                Ok(view)
            }
            Err(e) => {
                warn!(name = %name, attempts, error = %e, "gave up waiting for edge gateway");
                gateway.bind(Binding::Submitted { name });
                Err(e)
            }
        }
    }

    fn cancelled(&self, name: &str) -> CoreError {
        debug!(name, budget_secs = self.policy.budget.as_secs(), "visibility wait cancelled");
        CoreError::Cancelled { name: name.to_owned() }
    }

    fn timed_out(&self, name: &str) -> CoreError {
        // Rounded up, so a sub-second budget never reports 0s.
        let budget = self.policy.budget;
        CoreError::ProvisioningTimeout {
            name: name.to_owned(),
            waited_secs: budget.as_secs() + u64::from(budget.subsec_nanos() > 0),
        }
    }

    // ── Read ─────────────────────────────────────────────────────────

    /// Refresh the cached remote view. One attempt, no polling.
    ///
    /// An authoritative not-found clears the mirror's identity and is not
    /// an error. Any other failure keeps the identity.
    pub async fn read(&self, gateway: &mut ManagedGateway) -> Result<ReadOutcome, CoreError> {
        let Some(name) = gateway.binding().identity().map(str::to_owned) else {
            return Err(CoreError::InvalidState {
                operation: "read",
                state: gateway.binding().phase(),
            });
        };

        match self.api.read(&name).await {
            Ok(view) => {
                let binding = match gateway.binding() {
                    Binding::Reconciled { .. } => Binding::Reconciled {
                        name,
                        view: view.clone(),
                    },
                    // Seen, but nothing says its interfaces were pushed.
                    _ => Binding::Visible {
                        name,
                        view: view.clone(),
                    },
                };
                gateway.bind(binding);
                Ok(ReadOutcome::Present(view))
            }
            Err(e) if e.is_not_found() => {
                warn!(name = %name, "edge gateway no longer exists; clearing identity");
                gateway.clear_identity();
                Ok(ReadOutcome::Absent)
            }
            Err(e) => Err(e),
        }
    }

    // ── Update ───────────────────────────────────────────────────────

    /// Apply a new declaration to an existing gateway.
    ///
    /// Only a real interface change (or a gateway that never received its
    /// interfaces) reaches the controller, and then with the whole
    /// collection. ForceNew changes are refused.
    pub async fn update(
        &self,
        gateway: &mut ManagedGateway,
        desired: EdgeGateway,
    ) -> Result<Plan, CoreError> {
        let (name, pending_push) = match gateway.binding() {
            Binding::Visible { name, .. } => (name.clone(), true),
            Binding::Reconciled { name, .. } => (name.clone(), false),
            other => {
                return Err(CoreError::InvalidState {
                    operation: "update",
                    state: other.phase(),
                });
            }
        };

        let planned = plan(Some(gateway.desired()), &desired);
        if let Plan::Replace { fields } = &planned {
            return Err(CoreError::ReplacementRequired {
                name,
                fields: fields.join(", "),
            });
        }

        if !planned.requires_remote_update() && !pending_push {
            debug!(name = %name, plan = %planned.summary(), "no remote update needed");
            gateway.set_desired(desired);
            return Ok(planned);
        }

        info!(name = %name, plan = %planned.summary(), "updating edge gateway interfaces");
        self.api.update(&desired).await?;
        gateway.set_desired(desired);

        let view = self.api.read(&name).await?;
        gateway.bind(Binding::Reconciled { name, view });
        Ok(planned)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete the remote gateway. Any failure, including "already gone",
    /// is returned as is and the mirror keeps its identity.
    pub async fn delete(&self, gateway: &mut ManagedGateway) -> Result<(), CoreError> {
        let Some(name) = gateway.binding().identity().map(str::to_owned) else {
            return Err(CoreError::InvalidState {
                operation: "delete",
                state: gateway.binding().phase(),
            });
        };

        let desired = gateway.desired();
        info!(name = %name, project = %desired.project_id, device = %desired.device_id, "deleting edge gateway");
        self.api
            .delete(&desired.project_id, &desired.device_id, &name)
            .await?;

        gateway.bind(Binding::Destroyed { name });
        Ok(())
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Adopt an existing remote gateway.
    ///
    /// Only `name` and `site_id` are taken from the controller; everything
    /// else in `desired` is kept as declared. A missing gateway is an error
    /// here, since there is nothing to adopt.
    pub async fn import(
        &self,
        name: &str,
        mut desired: EdgeGateway,
    ) -> Result<ManagedGateway, CoreError> {
        let view = self.api.read(name).await?;

        desired.name = if view.name.is_empty() {
            name.to_owned()
        } else {
            view.name.clone()
        };
        if let Some(site) = view.site_id.as_ref().filter(|s| !s.is_empty()) {
            desired.site_id.clone_from(site);
        }
        info!(name = %desired.name, site = %desired.site_id, "imported edge gateway");

        let name = desired.name.clone();
        let mut managed = ManagedGateway::new(desired);
        managed.bind(Binding::Reconciled { name, view });
        Ok(managed)
    }
}
