//! `edgegw destroy`: delete the tracked gateway.

use edgegw_core::{ControllerClient, Reconciler};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::state::StateFile;

use super::util;

pub async fn handle(
    engine: &Reconciler<ControllerClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = StateFile::new(&global.state);
    let mut managed = state.require()?;
    let Some(name) = managed.binding().identity().map(str::to_owned) else {
        return Err(CliError::NoState {
            path: state.path().display().to_string(),
        });
    };

    if !util::confirm(
        &format!("Delete edge gateway '{name}'? This is destructive."),
        "destroy",
        global.yes,
    )? {
        return Ok(());
    }

    engine.delete(&mut managed).await?;
    state.remove()?;
    if !global.quiet {
        eprintln!("Edge gateway '{name}' deleted");
    }
    Ok(())
}
