#![allow(clippy::unwrap_used)]

// Engine tests against a scripted controller. The tokio clock is paused,
// so twenty minutes of polling run instantly and deterministically.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use edgegw_core::{
    AdminState, Binding, CoreError, EdgeGateway, GatewayApi, InterfaceConfig, ManagedGateway,
    Plan, ReadOutcome, Reconciler, RemoteGatewayView, VisibilityPolicy,
};

// ── Scripted controller ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Reply {
    Found,
    NotFound,
    Transient,
    Rejected,
}

#[derive(Default)]
struct ScriptedApi {
    create_reply: Mutex<Option<Reply>>,
    update_reply: Mutex<Option<Reply>>,
    delete_reply: Mutex<Option<Reply>>,
    /// Read replies consumed in order; once empty, `read_fallback` applies.
    reads: Mutex<VecDeque<Reply>>,
    read_fallback: Mutex<Option<Reply>>,
    site_on_read: Mutex<Option<String>>,
    /// How long each read takes to answer.
    read_delay: Mutex<Option<Duration>>,

    create_calls: AtomicUsize,
    read_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    updated_with: Mutex<Vec<Vec<InterfaceConfig>>>,
    deleted_with: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedApi {
    fn with_reads(reads: impl IntoIterator<Item = Reply>, fallback: Reply) -> Self {
        let api = Self::default();
        *api.reads.lock().unwrap() = reads.into_iter().collect();
        *api.read_fallback.lock().unwrap() = Some(fallback);
        api
    }

    fn reply_for(slot: &Mutex<Option<Reply>>) -> Reply {
        slot.lock().unwrap().unwrap_or(Reply::Found)
    }

    fn outcome(reply: Reply, action: &str) -> Result<(), CoreError> {
        match reply {
            Reply::Found => Ok(()),
            Reply::NotFound => Err(CoreError::NotFound {
                action: action.into(),
                message: "Gateway does not exist".into(),
            }),
            Reply::Transient => Err(CoreError::Transient {
                action: action.into(),
                message: "HTTP 502".into(),
            }),
            Reply::Rejected => Err(CoreError::RemoteRejected {
                action: action.into(),
                message: "controller said no".into(),
            }),
        }
    }

    fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn reads(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayApi for ScriptedApi {
    async fn create(&self, _gateway: &EdgeGateway) -> Result<(), CoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Self::outcome(Self::reply_for(&self.create_reply), "create_edge_csp_gateway")
    }

    async fn read(&self, name: &str) -> Result<RemoteGatewayView, CoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .reads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::reply_for(&self.read_fallback));
        Self::outcome(reply, "get_gateway_info")?;
        Ok(RemoteGatewayView {
            name: name.to_owned(),
            site_id: self.site_on_read.lock().unwrap().clone(),
            vpc_id: Some("vpc-1".into()),
            vpc_state: Some("up".into()),
            status: Some("up".into()),
            observed_at: Utc::now(),
        })
    }

    async fn update(&self, gateway: &EdgeGateway) -> Result<(), CoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updated_with
            .lock()
            .unwrap()
            .push(gateway.interfaces.clone());
        Self::outcome(Self::reply_for(&self.update_reply), "update_edge_gateway")
    }

    async fn delete(&self, project_id: &str, device_id: &str, name: &str) -> Result<(), CoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.deleted_with.lock().unwrap().push((
            project_id.to_owned(),
            device_id.to_owned(),
            name.to_owned(),
        ));
        Self::outcome(Self::reply_for(&self.delete_reply), "delete_edge_csp_gateway")
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn iface(name: &str, ip: &str) -> InterfaceConfig {
    InterfaceConfig {
        name: name.into(),
        interface_type: "LAN".into(),
        public_ip: None,
        tag: None,
        dhcp: false,
        ip_address: ip.into(),
        gateway_ip: None,
        dns_primary: None,
        dns_secondary: None,
        admin_state: AdminState::Enabled,
    }
}

fn gateway() -> EdgeGateway {
    EdgeGateway {
        name: "edge-1".into(),
        site_id: "site-a".into(),
        project_id: "proj-1".into(),
        device_id: "dev-1".into(),
        wan_interfaces: vec!["eth0".into()],
        lan_interfaces: vec!["eth1".into()],
        mgmt_interfaces: vec!["eth2".into()],
        management_ip: "10.1.0.1".into(),
        dhcp: false,
        interfaces: vec![iface("eth0", "192.0.2.2/30"), iface("eth1", "10.1.1.1/24")],
    }
}

fn reconciler(api: ScriptedApi) -> Reconciler<ScriptedApi> {
    Reconciler::new(api, VisibilityPolicy::default())
}

async fn reconciled(engine: &Reconciler<ScriptedApi>) -> ManagedGateway {
    let mut managed = ManagedGateway::new(gateway());
    engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap();
    managed
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn create_waits_through_not_found_then_pushes_interfaces_once() {
    let engine = reconciler(ScriptedApi::with_reads(
        [Reply::NotFound, Reply::NotFound, Reply::NotFound],
        Reply::Found,
    ));
    let mut managed = ManagedGateway::new(gateway());

    let started = tokio::time::Instant::now();
    engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap();

    let api = engine.api();
    assert_eq!(api.creates(), 1);
    assert_eq!(api.updates(), 1);
    // Four polls plus the final refresh.
    assert_eq!(api.reads(), 5);
    assert_eq!(started.elapsed(), Duration::from_secs(40));
    assert!(matches!(managed.binding(), Binding::Reconciled { name, .. } if name == "edge-1"));
    assert_eq!(api.updated_with.lock().unwrap()[0], gateway().interfaces);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_like_absence() {
    let engine = reconciler(ScriptedApi::with_reads(
        [Reply::Transient, Reply::NotFound, Reply::Transient],
        Reply::Found,
    ));
    let mut managed = ManagedGateway::new(gateway());
    engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(engine.api().updates(), 1);
    assert_eq!(managed.binding().phase(), "reconciled");
}

#[tokio::test(start_paused = true)]
async fn never_visible_times_out_without_update() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::NotFound));
    let mut managed = ManagedGateway::new(gateway());

    let started = tokio::time::Instant::now();
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::ProvisioningTimeout { ref name, waited_secs: 1200 } if name == "edge-1"),
        "got {err:?}"
    );
    assert_eq!(started.elapsed(), Duration::from_secs(1200));
    assert_eq!(engine.api().updates(), 0);
    assert!(engine.api().reads() <= 120);
    assert!(matches!(managed.binding(), Binding::Submitted { .. }));
}

#[tokio::test(start_paused = true)]
async fn custom_policy_bounds_the_wait() {
    let engine = Reconciler::new(
        ScriptedApi::with_reads([], Reply::NotFound),
        VisibilityPolicy::new(Duration::from_secs(1), Duration::from_secs(5)),
    );
    let mut managed = ManagedGateway::new(gateway());
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ProvisioningTimeout { waited_secs: 5, .. }));
    assert_eq!(engine.api().reads(), 4);
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_the_wait_and_leaves_submitted() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::NotFound));
    let mut managed = ManagedGateway::new(gateway());

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(25)).await;
        trigger.cancel();
    });

    let err = engine.create(&mut managed, &token).await.unwrap_err();
    assert!(matches!(err, CoreError::Cancelled { .. }), "got {err:?}");
    assert_eq!(engine.api().reads(), 2);
    assert_eq!(engine.api().updates(), 0);
    assert!(matches!(managed.binding(), Binding::Submitted { .. }));
}

#[tokio::test(start_paused = true)]
async fn sub_second_budget_reports_whole_seconds_rounded_up() {
    let engine = Reconciler::new(
        ScriptedApi::with_reads([], Reply::NotFound),
        VisibilityPolicy::new(Duration::from_millis(200), Duration::from_millis(1500)),
    );
    let mut managed = ManagedGateway::new(gateway());
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, CoreError::ProvisioningTimeout { waited_secs: 2, .. }),
        "got {err:?}"
    );
    assert!(err.to_string().contains("within 2s"));
}

#[tokio::test(start_paused = true)]
async fn deadline_interrupts_a_slow_read() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.read_delay.lock().unwrap() = Some(Duration::from_secs(30));
    let engine = Reconciler::new(
        api,
        VisibilityPolicy::new(Duration::from_secs(10), Duration::from_secs(15)),
    );
    let mut managed = ManagedGateway::new(gateway());

    let started = tokio::time::Instant::now();
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::ProvisioningTimeout { waited_secs: 15, .. }),
        "got {err:?}"
    );
    // The read started at 10s and was still pending when the budget ran out.
    assert_eq!(started.elapsed(), Duration::from_secs(15));
    assert_eq!(engine.api().reads(), 1);
    assert_eq!(engine.api().updates(), 0);
    assert!(matches!(managed.binding(), Binding::Submitted { name } if name == "edge-1"));
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_a_slow_read() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.read_delay.lock().unwrap() = Some(Duration::from_secs(60));
    let engine = reconciler(api);
    let mut managed = ManagedGateway::new(gateway());

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(25)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    let err = engine.create(&mut managed, &token).await.unwrap_err();

    assert!(matches!(err, CoreError::Cancelled { .. }), "got {err:?}");
    assert_eq!(started.elapsed(), Duration::from_secs(25));
    assert_eq!(engine.api().reads(), 1);
    assert_eq!(engine.api().updates(), 0);
    assert!(matches!(managed.binding(), Binding::Submitted { .. }));
}

#[tokio::test(start_paused = true)]
async fn failed_submit_leaves_a_discardable_identity() {
    let api = ScriptedApi::default();
    *api.create_reply.lock().unwrap() = Some(Reply::Rejected);
    let engine = reconciler(api);
    let mut managed = ManagedGateway::new(gateway());

    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.action(), Some("create_edge_csp_gateway"));
    assert_eq!(managed.binding().identity(), Some("edge-1"));
    assert_eq!(engine.api().reads(), 0);

    assert!(managed.discard());
    assert_eq!(managed.binding(), &Binding::Unbound);
}

#[tokio::test(start_paused = true)]
async fn failed_interface_push_reports_partial_success() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.update_reply.lock().unwrap() = Some(Reply::Rejected);
    let engine = reconciler(api);
    let mut managed = ManagedGateway::new(gateway());

    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::RemoteRejected { .. }));
    assert!(matches!(managed.binding(), Binding::Visible { .. }));
    assert!(!managed.discard(), "a visible gateway must not be discarded");
}

#[tokio::test(start_paused = true)]
async fn auth_failure_stops_polling() {
    struct Expired;

    #[async_trait]
    impl GatewayApi for Expired {
        async fn create(&self, _: &EdgeGateway) -> Result<(), CoreError> {
            Ok(())
        }
        async fn read(&self, _: &str) -> Result<RemoteGatewayView, CoreError> {
            Err(CoreError::AuthenticationFailed {
                message: "CID expired".into(),
            })
        }
        async fn update(&self, _: &EdgeGateway) -> Result<(), CoreError> {
            Ok(())
        }
        async fn delete(&self, _: &str, _: &str, _: &str) -> Result<(), CoreError> {
            Ok(())
        }
    }

    let engine = Reconciler::new(Expired, VisibilityPolicy::default());
    let mut managed = ManagedGateway::new(gateway());
    let started = tokio::time::Instant::now();
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn create_requires_an_unbound_mirror() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;
    let err = engine
        .create(&mut managed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidState { state: "reconciled", .. }));
    assert_eq!(engine.api().creates(), 1);
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn read_of_missing_gateway_clears_identity() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;
    *engine.api().read_fallback.lock().unwrap() = Some(Reply::NotFound);

    let outcome = engine.read(&mut managed).await.unwrap();
    assert_eq!(outcome, ReadOutcome::Absent);
    assert_eq!(managed.binding().identity(), None);
    assert_eq!(managed.desired(), &gateway());
}

#[tokio::test(start_paused = true)]
async fn read_failure_keeps_identity() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;
    *engine.api().read_fallback.lock().unwrap() = Some(Reply::Transient);

    let err = engine.read(&mut managed).await.unwrap_err();
    assert!(matches!(err, CoreError::Transient { .. }));
    assert_eq!(managed.binding().identity(), Some("edge-1"));
}

#[tokio::test(start_paused = true)]
async fn read_never_touches_desired_state() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.site_on_read.lock().unwrap() = Some("site-elsewhere".into());
    let engine = reconciler(api);
    let mut managed = reconciled(&engine).await;

    let ReadOutcome::Present(view) = engine.read(&mut managed).await.unwrap() else {
        panic!("expected the gateway to be present");
    };
    assert_eq!(view.site_id.as_deref(), Some("site-elsewhere"));
    assert_eq!(managed.desired().site_id, "site-a");
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn reordered_interfaces_skip_the_update() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;

    let mut desired = gateway();
    desired.interfaces.reverse();
    let planned = engine.update(&mut managed, desired).await.unwrap();

    assert_eq!(planned, Plan::Unchanged);
    assert_eq!(engine.api().updates(), 1, "only the create-time push");
}

#[tokio::test(start_paused = true)]
async fn changed_interface_resubmits_the_whole_collection() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;

    let mut desired = gateway();
    desired.interfaces[0].dns_primary = Some("9.9.9.9".into());
    desired.interfaces.push(iface("eth3", "10.1.3.1/24"));
    let planned = engine.update(&mut managed, desired.clone()).await.unwrap();

    assert!(planned.requires_remote_update());
    let pushed = engine.api().updated_with.lock().unwrap().clone();
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed[1], desired.interfaces);
    assert_eq!(managed.desired(), &desired);
}

#[tokio::test(start_paused = true)]
async fn force_new_change_is_refused() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;

    let mut desired = gateway();
    desired.site_id = "site-b".into();
    let err = engine.update(&mut managed, desired).await.unwrap_err();

    assert!(matches!(err, CoreError::ReplacementRequired { ref fields, .. } if fields == "site_id"));
    assert_eq!(managed.desired().site_id, "site-a");
    assert_eq!(engine.api().updates(), 1);
}

#[tokio::test(start_paused = true)]
async fn visible_gateway_gets_its_pending_push() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.update_reply.lock().unwrap() = Some(Reply::Rejected);
    let engine = reconciler(api);
    let mut managed = ManagedGateway::new(gateway());
    let _ = engine.create(&mut managed, &CancellationToken::new()).await;
    assert!(matches!(managed.binding(), Binding::Visible { .. }));

    *engine.api().update_reply.lock().unwrap() = Some(Reply::Found);
    let planned = engine.update(&mut managed, gateway()).await.unwrap();

    assert_eq!(planned, Plan::Unchanged);
    assert_eq!(engine.api().updates(), 2);
    assert!(matches!(managed.binding(), Binding::Reconciled { .. }));
}

#[tokio::test(start_paused = true)]
async fn update_before_visibility_is_rejected() {
    let api = ScriptedApi::default();
    *api.create_reply.lock().unwrap() = Some(Reply::Transient);
    let engine = reconciler(api);
    let mut managed = ManagedGateway::new(gateway());
    let _ = engine.create(&mut managed, &CancellationToken::new()).await;

    let err = engine.update(&mut managed, gateway()).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidState { state: "submitted", .. }));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn delete_forwards_project_device_and_name() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;

    engine.delete(&mut managed).await.unwrap();

    assert_eq!(
        engine.api().deleted_with.lock().unwrap().as_slice(),
        &[("proj-1".to_owned(), "dev-1".to_owned(), "edge-1".to_owned())]
    );
    assert!(matches!(managed.binding(), Binding::Destroyed { .. }));

    let err = engine.delete(&mut managed).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidState { state: "destroyed", .. }));
    assert_eq!(engine.api().deletes(), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_surfaces_already_gone_as_failure() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::Found));
    let mut managed = reconciled(&engine).await;
    *engine.api().delete_reply.lock().unwrap() = Some(Reply::NotFound);

    let err = engine.delete(&mut managed).await.unwrap_err();
    match err {
        CoreError::NotFound { action, message } => {
            assert_eq!(action, "delete_edge_csp_gateway");
            assert_eq!(message, "Gateway does not exist");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(managed.binding().identity(), Some("edge-1"));
}

// ── Import ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn import_copies_only_name_and_site() {
    let api = ScriptedApi::with_reads([], Reply::Found);
    *api.site_on_read.lock().unwrap() = Some("site-remote".into());
    let engine = reconciler(api);

    let mut declared = gateway();
    declared.name = "placeholder".into();
    let managed = engine.import("edge-remote", declared).await.unwrap();

    assert_eq!(managed.desired().name, "edge-remote");
    assert_eq!(managed.desired().site_id, "site-remote");
    assert_eq!(managed.desired().project_id, "proj-1");
    assert_eq!(managed.desired().interfaces, gateway().interfaces);
    assert!(matches!(managed.binding(), Binding::Reconciled { name, .. } if name == "edge-remote"));
}

#[tokio::test(start_paused = true)]
async fn import_of_missing_gateway_fails() {
    let engine = reconciler(ScriptedApi::with_reads([], Reply::NotFound));
    let err = engine.import("ghost", gateway()).await.unwrap_err();
    assert!(err.is_not_found());
}
