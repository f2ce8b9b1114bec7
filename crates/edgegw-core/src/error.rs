// ── Core error types ──
//
// Reconciliation-level errors. Consumers never see HTTP status codes or
// envelope parse failures directly. The `From<edgegw_api::Error>` impl
// sorts transport-layer errors into the not-found / transient / rejected
// buckets the engine decides on.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Remote outcomes ──────────────────────────────────────────────
    /// The controller says the gateway does not exist.
    #[error("{action}: gateway not found ({message})")]
    NotFound { action: String, message: String },

    /// Ambiguous failure: malformed response, timeout, server error.
    #[error("{action} failed transiently: {message}")]
    Transient { action: String, message: String },

    /// Any other error the controller reported.
    #[error("Controller rejected {action}: {message}")]
    RemoteRejected { action: String, message: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Edge gateway '{name}' did not become visible within {waited_secs}s")]
    ProvisioningTimeout { name: String, waited_secs: u64 },

    #[error("Waiting for edge gateway '{name}' was cancelled; its remote state is unknown")]
    Cancelled { name: String },

    #[error("Changing {fields} requires replacing edge gateway '{name}'")]
    ReplacementRequired { name: String, fields: String },

    #[error("Cannot {operation} an edge gateway in state '{state}'")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Authoritative absence of the remote gateway.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the visibility loop should keep polling after this error.
    ///
    /// "Not visible yet" and "controller hiccup" are deliberately the same
    /// answer here. Only local faults that waiting cannot fix stop the loop.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Transient { .. }
                | Self::RemoteRejected { .. }
                | Self::ConnectionFailed { .. }
        )
    }

    /// The remote action this error was raised for, if any.
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::NotFound { action, .. }
            | Self::Transient { action, .. }
            | Self::RemoteRejected { action, .. } => Some(action),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<edgegw_api::Error> for CoreError {
    /// Absence and transient-ness are decided by `edgegw_api::Error`
    /// itself. Connection failures are split out first so they keep their
    /// own kind (and exit code); they are retryable either way.
    fn from(err: edgegw_api::Error) -> Self {
        use edgegw_api::Error as ApiError;

        if let ApiError::Transport(ref e) = err {
            if e.is_connect() {
                return CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                };
            }
        }

        if err.is_not_found() {
            return CoreError::NotFound {
                action: err.action().unwrap_or("request").to_owned(),
                message: err.to_string(),
            };
        }

        if err.is_transient() {
            return CoreError::Transient {
                action: err.action().unwrap_or("request").to_owned(),
                message: err.to_string(),
            };
        }

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            ApiError::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "no session established with the controller".into(),
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            // Includes 404 from whatever answers at the configured URL.
            ApiError::Http {
                action,
                status,
                body,
            } => CoreError::RemoteRejected {
                action,
                message: format!("HTTP {status}: {body}"),
            },
            ApiError::Api { action, reason } => CoreError::RemoteRejected {
                action,
                message: reason,
            },
            ApiError::Transport(e) => {
                CoreError::Internal(format!("HTTP request could not be built: {e}"))
            }
            ApiError::Deserialization {
                action, message, ..
            } => CoreError::Transient { action, message },
            ApiError::Encoding { action, message } => {
                CoreError::Internal(format!("failed to encode {action} payload: {message}"))
            }
        }
    }
}
