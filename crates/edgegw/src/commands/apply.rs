//! `edgegw apply`: create, update, or replace the declared gateway.

use edgegw_core::{
    Binding, ControllerClient, CoreError, EdgeGateway, ManagedGateway, Plan, ReadOutcome,
    Reconciler,
};

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::state::StateFile;

use super::{report, util};

type Engine = Reconciler<ControllerClient>;

enum Step {
    Create,
    Recheck,
    Update,
}

pub async fn handle(
    engine: &Engine,
    args: &ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let desired = util::read_declaration(&args.declaration.file)?;
    let state = StateFile::new(&global.state);

    let mut managed = match state.load()? {
        Some(tracked) if tracked.binding().identity().is_some() => tracked,
        _ => ManagedGateway::new(desired.clone()),
    };

    let result = apply(engine, &mut managed, desired, args, global, &state).await;

    // Persist whatever the lifecycle reached, failed or not.
    state.save(&managed)?;
    result?;

    report::print_gateway(&managed, global);
    Ok(())
}

async fn apply(
    engine: &Engine,
    managed: &mut ManagedGateway,
    desired: EdgeGateway,
    args: &ApplyArgs,
    global: &GlobalOpts,
    state: &StateFile,
) -> Result<(), CliError> {
    let step = match managed.binding() {
        Binding::Unbound | Binding::Destroyed { .. } => Step::Create,
        Binding::Submitted { .. } | Binding::AwaitingVisibility { .. } => Step::Recheck,
        Binding::Visible { .. } | Binding::Reconciled { .. } => Step::Update,
    };

    match step {
        Step::Create => create(engine, managed, global).await,
        // A previous create never confirmed. Look once before deciding.
        Step::Recheck => match engine.read(managed).await? {
            ReadOutcome::Absent => {
                *managed = ManagedGateway::new(desired);
                create(engine, managed, global).await
            }
            ReadOutcome::Present(_) => update(engine, managed, desired, args, global, state).await,
        },
        Step::Update => update(engine, managed, desired, args, global, state).await,
    }
}

async fn create(
    engine: &Engine,
    managed: &mut ManagedGateway,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = managed.desired().name.clone();
    let cancel = util::cancel_on_ctrl_c();
    let spinner = util::spinner(
        format!("Creating edge gateway '{name}' and waiting for it to become visible"),
        global.quiet,
    );

    let result = engine.create(managed, &cancel).await;
    spinner.finish_and_clear();
    result?;

    if !global.quiet {
        eprintln!("Edge gateway '{name}' created");
    }
    Ok(())
}

async fn update(
    engine: &Engine,
    managed: &mut ManagedGateway,
    desired: EdgeGateway,
    args: &ApplyArgs,
    global: &GlobalOpts,
    state: &StateFile,
) -> Result<(), CliError> {
    match engine.update(managed, desired.clone()).await {
        Ok(planned) => {
            if !global.quiet {
                let name = &managed.desired().name;
                match planned {
                    Plan::Unchanged => eprintln!("Edge gateway '{name}' is up to date"),
                    other => eprintln!("Edge gateway '{name}': {}", other.summary()),
                }
            }
            Ok(())
        }
        Err(CoreError::ReplacementRequired { name, fields }) if args.allow_replace => {
            let prompt =
                format!("Replace edge gateway '{name}' (changed: {fields})? It is deleted first.");
            if !util::confirm(&prompt, "replace", global.yes)? {
                return Ok(());
            }
            engine.delete(managed).await?;
            state.save(managed)?;
            if !global.quiet {
                eprintln!("Edge gateway '{name}' deleted; recreating");
            }
            *managed = ManagedGateway::new(desired);
            create(engine, managed, global).await
        }
        Err(e) => Err(e.into()),
    }
}
