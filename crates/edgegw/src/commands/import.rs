//! `edgegw import`: adopt an existing remote gateway.

use edgegw_core::{ControllerClient, Reconciler};

use crate::cli::{GlobalOpts, ImportArgs};
use crate::error::CliError;
use crate::state::StateFile;

use super::{report, util};

pub async fn handle(
    engine: &Reconciler<ControllerClient>,
    args: &ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = StateFile::new(&global.state);
    let tracked = state.load()?;
    if let Some(name) = tracked.as_ref().and_then(|t| t.binding().identity()) {
        return Err(CliError::InvalidState {
            message: format!(
                "{} already tracks edge gateway '{name}'; destroy it or use another --state file",
                state.path().display()
            ),
        });
    }

    let declared = util::read_declaration(&args.declaration.file)?;
    let managed = engine.import(&args.name, declared).await?;
    state.save(&managed)?;

    if !global.quiet {
        eprintln!("Edge gateway '{}' imported", managed.desired().name);
    }
    report::print_gateway(&managed, global);
    Ok(())
}
