//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use edgegw_core::{EdgeGateway, GatewayInput};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a declaration file and build the desired state from it.
///
/// The format follows the extension: `.toml`, `.yaml` / `.yml`, or `.json`.
pub fn read_declaration(path: &Path) -> Result<EdgeGateway, CliError> {
    let declaration_err = |reason: String| CliError::Declaration {
        path: path.display().to_string(),
        reason,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| declaration_err(e.to_string()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let input: GatewayInput = match ext.as_deref() {
        Some("toml") => toml::from_str(&contents).map_err(|e| declaration_err(e.to_string()))?,
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&contents).map_err(|e| declaration_err(e.to_string()))?
        }
        Some("json") => {
            serde_json::from_str(&contents).map_err(|e| declaration_err(e.to_string()))?
        }
        other => {
            return Err(declaration_err(format!(
                "unsupported extension {:?}; expected .toml, .yaml, .yml or .json",
                other.unwrap_or("")
            )));
        }
    };

    Ok(input.build()?)
}

/// A token cancelled on the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling");
            trigger.cancel();
        }
    });
    token
}

/// Spinner on stderr; hidden in quiet mode or when stderr is not a terminal.
pub fn spinner(message: String, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
