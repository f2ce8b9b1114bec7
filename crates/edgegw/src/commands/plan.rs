//! `edgegw plan`: offline change preview.

use std::fmt::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

use edgegw_core::{Plan, plan};

use crate::cli::{DeclarationArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::state::StateFile;

use super::util;

#[derive(Serialize)]
struct PlanReport<'a> {
    name: &'a str,
    phase: &'static str,
    plan: &'a Plan,
}

fn marker(sign: &str, name: &str, color: bool) -> String {
    let line = format!("  {sign} {name}");
    if !color {
        return line;
    }
    match sign {
        "+" => line.green().to_string(),
        "-" => line.red().to_string(),
        _ => line.yellow().to_string(),
    }
}

fn detail(report: &PlanReport<'_>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}): {}",
        output::heading(report.name, color),
        output::paint_phase(report.phase, color),
        report.plan.summary()
    );
    match report.plan {
        Plan::UpdateInterfaces { delta } => {
            for name in &delta.added {
                let _ = writeln!(out, "{}", marker("+", name, color));
            }
            for name in &delta.removed {
                let _ = writeln!(out, "{}", marker("-", name, color));
            }
            for name in &delta.modified {
                let _ = writeln!(out, "{}", marker("~", name, color));
            }
        }
        Plan::Replace { .. } => {
            let _ = writeln!(out, "  apply needs --allow-replace to destroy and recreate");
        }
        Plan::Create | Plan::Unchanged | Plan::StateOnly { .. } => {}
    }
    out.trim_end().to_owned()
}

pub fn handle(args: &DeclarationArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let desired = util::read_declaration(&args.file)?;
    let state = StateFile::new(&global.state);
    let tracked = state
        .load()?
        .filter(|m| m.binding().identity().is_some());

    let planned = plan(tracked.as_ref().map(|m| m.desired()), &desired);
    tracing::debug!(plan = %planned.summary(), "planned");

    let report = PlanReport {
        name: &desired.name,
        phase: tracked.as_ref().map_or("unbound", |m| m.binding().phase()),
        plan: &planned,
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| r.plan.summary(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
