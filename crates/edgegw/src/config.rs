//! CLI configuration, a thin wrapper around `edgegw_config`.
//!
//! Adds the resolution step that respects `GlobalOpts` flag overrides
//! (--controller, --username, --insecure, --timeout).

use edgegw_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use edgegw_config::{Config, Profile, config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, flags and `EDGEGW_*` env vars alone must
/// name the controller.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: names.join(", "),
            });
        }
        None => Profile::default(),
    };

    // Flag > env > profile
    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if profile.controller.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let config = edgegw_config::profile_to_controller_config(&profile, &profile_name, &cfg.defaults)?;
    tracing::debug!(
        profile = %profile_name,
        url = %config.url,
        insecure = matches!(config.tls, TlsVerification::DangerAcceptInvalid),
        timeout_secs = config.timeout.as_secs(),
        poll_secs = config.visibility.interval.as_secs(),
        budget_secs = config.visibility.budget.as_secs(),
        "resolved controller config"
    );
    Ok(config)
}
