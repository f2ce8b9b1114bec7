// ── Runtime connection configuration ──
//
// These types describe *how* to reach a controller and how patiently to
// wait on it. They carry credential data and tuning, but never touch disk.
// The CLI builds a `ControllerConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::reconcile::VisibilityPolicy;

/// How to authenticate with a controller.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Username/password exchanged for a CID at connect time.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// A CID issued out of band.
    Cid(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://10.0.0.5`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Post-create visibility polling.
    pub visibility: VisibilityPolicy,
}
