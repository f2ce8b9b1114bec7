use thiserror::Error;

/// Top-level error type for the `edgegw-api` crate.
///
/// Covers every failure mode of the controller's action API:
/// authentication, transport, the `{return, results, reason}` envelope,
/// and payload encoding. `edgegw-core` maps these into reconciliation
/// outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The controller rejected the CID (expired or revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// An action was attempted before a CID was obtained.
    #[error("Not authenticated -- login or supply a CID first")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status outside the envelope protocol.
    #[error("HTTP {status} from {action}: {body}")]
    Http {
        action: String,
        status: u16,
        body: String,
    },

    // ── Envelope ────────────────────────────────────────────────────
    /// The controller answered `"return": false`.
    #[error("rest API {action} failed: {reason}")]
    Api { action: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error in {action}: {message}")]
    Deserialization {
        action: String,
        message: String,
        body: String,
    },

    /// A request payload could not be encoded.
    #[error("Failed to encode {action} payload: {message}")]
    Encoding { action: String, message: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::SessionExpired | Self::NotAuthenticated
        )
    }

    /// Returns `true` if the controller reported the resource as absent.
    ///
    /// Only the envelope can say this: a failed `return` whose reason says
    /// the object does not exist. A bare HTTP 404 comes from whatever sits
    /// at the URL (wrong base path, proxy, other host), not from the
    /// controller.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { reason, .. } => {
                let reason = reason.to_ascii_lowercase();
                reason.contains("does not exist") || reason.contains("not found")
            }
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Http { status, .. } => *status >= 500,
            Self::Deserialization { .. } => true,
            _ => false,
        }
    }

    /// The action discriminator this error was raised for, if known.
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::Http { action, .. }
            | Self::Api { action, .. }
            | Self::Deserialization { action, .. }
            | Self::Encoding { action, .. } => Some(action),
            _ => None,
        }
    }
}
