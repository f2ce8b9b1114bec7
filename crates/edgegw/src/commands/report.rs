//! Gateway detail rendering shared by apply, show and import.

use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;

use edgegw_core::{EdgeGateway, InterfaceConfig, ManagedGateway, RemoteGatewayView};

use crate::cli::GlobalOpts;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    if_type: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "DHCP")]
    dhcp: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

impl From<&InterfaceConfig> for InterfaceRow {
    fn from(i: &InterfaceConfig) -> Self {
        Self {
            name: i.name.clone(),
            if_type: i.interface_type.clone(),
            address: i.ip_address.clone(),
            gateway: i.gateway_ip.clone().unwrap_or_default(),
            dhcp: if i.dhcp { "yes" } else { "no" }.into(),
            admin: i.admin_state.to_string(),
        }
    }
}

// ── Report ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GatewayReport<'a> {
    name: &'a str,
    phase: &'static str,
    desired: &'a EdgeGateway,
    remote: Option<&'a RemoteGatewayView>,
}

fn detail(report: &GatewayReport<'_>, color: bool) -> String {
    let mut out = String::new();
    let gw = report.desired;
    let _ = writeln!(out, "{}", output::heading(&format!("Edge gateway {}", report.name), color));
    let _ = writeln!(out, "  Phase:       {}", output::paint_phase(report.phase, color));
    let _ = writeln!(out, "  Site:        {}", gw.site_id);
    let _ = writeln!(out, "  Project:     {}", gw.project_id);
    let _ = writeln!(out, "  Device:      {}", gw.device_id);
    let _ = writeln!(
        out,
        "  Management:  {} ({})",
        gw.management_ip,
        if gw.dhcp { "dhcp" } else { "static" }
    );
    let _ = writeln!(
        out,
        "  Roles:       wan={} lan={} mgmt={}",
        gw.wan_interfaces.join(","),
        gw.lan_interfaces.join(","),
        gw.mgmt_interfaces.join(",")
    );
    if let Some(view) = report.remote {
        let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        let _ = writeln!(out, "  VPC:         {} ({})", dash(&view.vpc_id), dash(&view.vpc_state));
        let _ = writeln!(out, "  Status:      {}", dash(&view.status));
        let _ = writeln!(
            out,
            "  Observed:    {}",
            view.observed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if !gw.interfaces.is_empty() {
        let rows: Vec<InterfaceRow> = gw.interfaces.iter().map(InterfaceRow::from).collect();
        let _ = writeln!(out);
        out.push_str(&output::render_table(&rows));
    }
    out.trim_end().to_owned()
}

/// Print the managed gateway in the selected output format.
pub fn print_gateway(managed: &ManagedGateway, global: &GlobalOpts) {
    let binding = managed.binding();
    let report = GatewayReport {
        name: binding.identity().unwrap_or(&managed.desired().name),
        phase: binding.phase(),
        desired: managed.desired(),
        remote: binding.view(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| r.name.to_owned(),
    );
    output::print_output(&out, global.quiet);
}
