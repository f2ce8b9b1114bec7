//! Command dispatch: bridges CLI args -> reconciler operations -> output.

pub mod apply;
pub mod config_cmd;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod report;
pub mod show;
pub mod util;

use edgegw_core::{ControllerClient, Reconciler};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    engine: &Reconciler<ControllerClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => apply::handle(engine, &args, global).await,
        Command::Show => show::handle(engine, global).await,
        Command::Import(args) => import::handle(engine, &args, global).await,
        Command::Destroy => destroy::handle(engine, global).await,
        // Handled before a controller connection is made
        Command::Plan(_) | Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "offline command dispatched to the controller".into(),
        )),
    }
}
