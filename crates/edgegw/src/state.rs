//! Local state file.
//!
//! One JSON document per tracked gateway: the last accepted declaration and
//! its lifecycle binding. Written after every operation, including failed
//! ones, so an interrupted create is resumed rather than repeated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use edgegw_core::ManagedGateway;

use crate::error::CliError;

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: u32,
    gateway: ManagedGateway,
}

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tracked gateway, or `None` when no state file exists yet.
    pub fn load(&self) -> Result<Option<ManagedGateway>, CliError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let doc: StateDocument = serde_json::from_str(&raw)?;
        if doc.version != STATE_VERSION {
            return Err(CliError::Validation {
                field: "state".into(),
                reason: format!(
                    "{} has version {}, expected {STATE_VERSION}",
                    self.path.display(),
                    doc.version
                ),
            });
        }
        Ok(Some(doc.gateway))
    }

    /// Like [`load`](Self::load), but absence is an error.
    pub fn require(&self) -> Result<ManagedGateway, CliError> {
        self.load()?.ok_or_else(|| CliError::NoState {
            path: self.path.display().to_string(),
        })
    }

    /// Write atomically via a sibling temp file.
    pub fn save(&self, gateway: &ManagedGateway) -> Result<(), CliError> {
        let doc = StateDocument {
            version: STATE_VERSION,
            gateway: gateway.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), phase = gateway.binding().phase(), "state saved");
        Ok(())
    }

    pub fn remove(&self) -> Result<(), CliError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
