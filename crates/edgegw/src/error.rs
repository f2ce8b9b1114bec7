//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use edgegw_config::ConfigError;
use edgegw_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(edgegw::connection_failed),
        help(
            "Check that the controller is reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(edgegw::auth_failed),
        help(
            "Verify the username and password (or CID) for this profile.\n\
             Run: edgegw config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(edgegw::no_credentials),
        help(
            "Set username in the profile and store a password with: edgegw config set-password\n\
             Or set EDGEGW_USERNAME / EDGEGW_PASSWORD (or EDGEGW_CID)."
        )
    )]
    NoCredentials { profile: String },

    // ── Gateway lifecycle ────────────────────────────────────────────
    #[error("Edge gateway not found ({action})")]
    #[diagnostic(
        code(edgegw::not_found),
        help("The controller reported: {message}")
    )]
    NotFound { action: String, message: String },

    #[error("Edge gateway '{name}' did not become visible within {waited_secs}s")]
    #[diagnostic(
        code(edgegw::provisioning_timeout),
        help(
            "The create request was accepted, but the controller never reported the gateway.\n\
             Run `edgegw show` later to check, or raise visibility_timeout in your profile."
        )
    )]
    ProvisioningTimeout { name: String, waited_secs: u64 },

    #[error("Waiting for edge gateway '{name}' was cancelled")]
    #[diagnostic(
        code(edgegw::cancelled),
        help("The gateway may still be provisioning. Run `edgegw apply` again to resume.")
    )]
    Cancelled { name: String },

    #[error("Changing {fields} requires replacing edge gateway '{name}'")]
    #[diagnostic(
        code(edgegw::replacement_required),
        help("Re-run with --allow-replace to destroy and recreate it.")
    )]
    ReplacementRequired { name: String, fields: String },

    #[error("{message}")]
    #[diagnostic(code(edgegw::invalid_state))]
    InvalidState { message: String },

    #[error("Controller rejected {action}: {message}")]
    #[diagnostic(code(edgegw::api_error))]
    ApiError { action: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(edgegw::validation))]
    Validation { field: String, reason: String },

    #[error("Cannot read declaration {path}")]
    #[diagnostic(
        code(edgegw::declaration),
        help("{reason}")
    )]
    Declaration { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(edgegw::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(edgegw::no_config),
        help(
            "Pass --controller, set EDGEGW_CONTROLLER, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(edgegw::config))]
    Config(Box<figment::Error>),

    #[error("No gateway is tracked in {path}")]
    #[diagnostic(
        code(edgegw::no_state),
        help("Run `edgegw apply -f <file>` or `edgegw import <name> -f <file>` first.")
    )]
    NoState { path: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(edgegw::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Keyring error: {0}")]
    #[diagnostic(code(edgegw::keyring))]
    Keyring(String),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(edgegw::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid state file: {0}")]
    #[diagnostic(
        code(edgegw::json),
        help("The state file is not valid JSON; restore it or re-import the gateway.")
    )]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoState { .. } => exit_code::NOT_FOUND,
            Self::ReplacementRequired { .. } | Self::InvalidState { .. } => exit_code::CONFLICT,
            Self::ProvisioningTimeout { .. } => exit_code::TIMEOUT,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            Self::Validation { .. }
            | Self::Declaration { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotFound { action, message } => CliError::NotFound { action, message },
            CoreError::Transient { action, message } | CoreError::RemoteRejected { action, message } => {
                CliError::ApiError { action, message }
            }
            CoreError::ProvisioningTimeout { name, waited_secs } => {
                CliError::ProvisioningTimeout { name, waited_secs }
            }
            CoreError::Cancelled { name } => CliError::Cancelled { name },
            CoreError::ReplacementRequired { name, fields } => {
                CliError::ReplacementRequired { name, fields }
            }
            err @ CoreError::InvalidState { .. } => CliError::InvalidState {
                message: err.to_string(),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "declaration".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
