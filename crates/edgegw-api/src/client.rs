// Controller action API HTTP client
//
// Wraps `reqwest::Client` with action-keyed request construction, CID
// injection, and `{ return, results, reason }` envelope unwrapping.
// Endpoint methods live in sibling modules as inherent impls so this one
// stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiEnvelope;
use crate::transport::TransportConfig;

/// Reason fragments the controller uses when a CID is no longer valid.
const EXPIRED_CID_MARKERS: [&str; 2] = ["cid is invalid", "cid expired"];

const BODY_PREVIEW_LEN: usize = 200;

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(rename = "return")]
    ok: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(rename = "CID", default)]
    cid: Option<String>,
}

/// Raw HTTP client for the controller's action API.
///
/// Every call is an `action` discriminator plus a flat payload. Queries go
/// out as `GET /v1/api?action=...`, mutations as JSON `POST /v2/api`. All
/// methods return the unwrapped `results` payload -- the envelope is
/// stripped before the caller sees it.
pub struct ControllerClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session identifier issued by `login`. Sent as `CID` on every action.
    cid: RwLock<Option<SecretString>>,
}

impl ControllerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root (e.g. `https://10.0.0.5`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            cid: RwLock::new(None),
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a CID is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.cid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Install a pre-issued CID, skipping `login`.
    pub fn set_cid(&self, cid: SecretString) {
        debug!("storing CID");
        *self.cid.write().unwrap_or_else(PoisonError::into_inner) = Some(cid);
    }

    fn current_cid(&self) -> Result<String, Error> {
        self.cid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cid| cid.expose_secret().to_owned())
            .ok_or(Error::NotAuthenticated)
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Authenticate with username/password and store the returned CID.
    ///
    /// `POST /v1/api` with form `action=login`.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("v1")?;
        debug!(username, "logging in");

        let form = [
            ("action", "login"),
            ("username", username),
            ("password", password.expose_secret()),
        ];
        let resp = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login returned HTTP {status}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                action: "login".into(),
                message: e.to_string(),
                body: body.clone(),
            })?;

        match (login.ok, login.cid) {
            (true, Some(cid)) => {
                self.set_cid(SecretString::from(cid));
                debug!("login successful");
                Ok(())
            }
            (true, None) => Err(Error::Authentication {
                message: "login succeeded but no CID was returned".into(),
            }),
            (false, _) => Err(Error::Authentication {
                message: login.reason.unwrap_or_else(|| "login rejected".into()),
            }),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/{version}/api`
    pub(crate) fn api_url(&self, version: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{version}/api"))?)
    }

    // ── Action primitives ────────────────────────────────────────────

    /// Submit a mutating action and require an affirmative envelope.
    ///
    /// `POST /v2/api` with the payload's fields plus `action` and `CID`
    /// merged into one JSON object. Any `results` are discarded.
    pub async fn invoke(&self, action: &str, payload: &(impl Serialize + Sync)) -> Result<(), Error> {
        let url = self.api_url("v2")?;
        let body = self.action_body(action, payload)?;
        debug!(action, "POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let _: Option<serde_json::Value> = self.parse_envelope(action, resp).await?;
        Ok(())
    }

    /// Run a query action and decode its `results`.
    ///
    /// `GET /v1/api?action=...&CID=...` with the payload flattened into
    /// query parameters.
    pub async fn invoke_and_decode<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url("v1")?;
        let cid = self.current_cid()?;
        debug!(action, "GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[("action", action), ("CID", cid.as_str())])
            .query(payload)
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_envelope(action, resp)
            .await?
            .ok_or_else(|| Error::Deserialization {
                action: action.to_owned(),
                message: "envelope carried no results".into(),
                body: String::new(),
            })
    }

    fn action_body(
        &self,
        action: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<serde_json::Value, Error> {
        let cid = self.current_cid()?;
        let value = serde_json::to_value(payload).map_err(|e| Error::Encoding {
            action: action.to_owned(),
            message: e.to_string(),
        })?;

        let serde_json::Value::Object(mut map) = value else {
            return Err(Error::Encoding {
                action: action.to_owned(),
                message: "payload must serialize to a JSON object".into(),
            });
        };
        map.insert("action".into(), serde_json::Value::String(action.to_owned()));
        map.insert("CID".into(), serde_json::Value::String(cid));
        Ok(serde_json::Value::Object(map))
    }

    /// Parse the `{ return, results, reason }` envelope, returning `results`
    /// on success or an `Error::Api` if `return` is false.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        action: &str,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                action: action.to_owned(),
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(action, body = preview(&body), "envelope received");

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                action: action.to_owned(),
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        if envelope.ok {
            return Ok(envelope.results);
        }

        let reason = envelope
            .reason
            .unwrap_or_else(|| "no reason given".into());
        let lowered = reason.to_ascii_lowercase();
        if EXPIRED_CID_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Err(Error::SessionExpired);
        }

        Err(Error::Api {
            action: action.to_owned(),
            reason,
        })
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
