//! `edgegw show`: refresh the tracked gateway from the controller.

use edgegw_core::{ControllerClient, ReadOutcome, Reconciler};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::state::StateFile;

use super::report;

pub async fn handle(
    engine: &Reconciler<ControllerClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = StateFile::new(&global.state);
    let mut managed = state.require()?;

    if managed.binding().identity().is_some() {
        let outcome = engine.read(&mut managed).await?;
        state.save(&managed)?;
        if outcome == ReadOutcome::Absent && !global.quiet {
            eprintln!(
                "Edge gateway '{}' no longer exists on the controller; run `edgegw apply` to recreate it",
                managed.desired().name
            );
        }
    }

    report::print_gateway(&managed, global);
    Ok(())
}
