//! Device-facing operations, independent of HTTP.
//!
//! [`AppState`] owns the catalog, the session table, the credential deriver
//! and the provisioning policy. Handlers call [`AppState::provision`],
//! [`AppState::display`] and [`AppState::accept_log`], then encode the result.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::auth::{AccessPolicy, Credential, CredentialDeriver, FriendlyId};
use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, TrmnlError};
use crate::rotation;
use crate::session::SessionTable;

/// Characters of the access token shown next to device log lines.
const LOG_TOKEN_PREFIX_LEN: usize = 8;

/// Shared server state.
#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub sessions: SessionTable,
    pub deriver: CredentialDeriver,
    pub policy: AccessPolicy,
    /// Base for image URLs; derived from each request when unset.
    pub public_url: Option<String>,
}

pub type SharedState = Arc<AppState>;

/// Outcome of a successful provisioning request.
#[derive(Debug, Clone)]
pub struct ProvisionResult {
    pub credential: Credential,
    pub friendly_id: FriendlyId,
    pub message: String,
    /// Image the device shows right after registering.
    pub first_image: Option<CatalogEntry>,
}

/// Outcome of a successful display request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult {
    pub image_path: String,
    pub refresh_secs: u32,
    pub ordinal: usize,
}

/// A device log record accepted for output.
#[derive(Debug, Clone, PartialEq)]
pub struct LogAccepted {
    pub token_prefix: String,
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
struct LogRequest {
    #[serde(default)]
    log: Value,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        deriver: CredentialDeriver,
        policy: AccessPolicy,
        public_url: Option<String>,
    ) -> Self {
        Self {
            catalog,
            sessions: SessionTable::new(),
            deriver,
            policy,
            public_url,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Issue a credential to a device, subject to the provisioning policy.
    #[instrument(skip(self))]
    pub fn provision(&self, device_id: &str) -> Result<ProvisionResult> {
        self.policy.check_provisioning(device_id)?;

        let credential = self.deriver.derive(device_id)?;
        let friendly_id = credential.friendly_id();
        info!(device = %device_id.trim(), friendly_id = %friendly_id, "Device provisioned");

        Ok(ProvisionResult {
            message: format!("Device registered with friendly ID '{friendly_id}'"),
            credential,
            friendly_id,
            first_image: self.catalog.first().cloned(),
        })
    }

    /// Authenticate a device and advance it to its next image.
    #[instrument(skip(self, access_token))]
    pub fn display(&self, device_id: &str, access_token: &str) -> Result<DisplayResult> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(TrmnlError::MissingIdentifier);
        }
        if access_token.trim().is_empty() {
            return Err(TrmnlError::MissingCredential);
        }
        self.deriver.validate(device_id, access_token)?;

        let session = self.sessions.session_for(device_id);
        let next = rotation::next(session.cursor, &self.catalog)?;
        self.sessions.advance(device_id, next.ordinal, Utc::now());

        debug!(
            image = %next.entry.path,
            ordinal = next.ordinal,
            refresh_secs = next.duration_secs,
            "Serving image"
        );
        Ok(DisplayResult {
            image_path: next.entry.path.clone(),
            refresh_secs: next.duration_secs,
            ordinal: next.ordinal,
        })
    }

    /// Accept a device log upload.
    ///
    /// Only the presence of a token is checked. The `log` value is opaque and
    /// re-serialized as-is.
    pub fn accept_log(&self, access_token: Option<&str>, body: &[u8]) -> Result<LogAccepted> {
        let token = access_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TrmnlError::MissingCredential)?;

        let request: LogRequest = serde_json::from_slice(body)
            .map_err(|e| TrmnlError::MalformedLogPayload(e.to_string()))?;

        let token_prefix: String = token.chars().take(LOG_TOKEN_PREFIX_LEN).collect();
        info!(token = %token_prefix, log = %request.log, "Device log");

        Ok(LogAccepted {
            token_prefix,
            payload: request.log,
        })
    }
}
