//! Stateless device credentials.
//!
//! A device credential is `hex(SHA-256(device_id ++ secret))`. Nothing is
//! stored: the server recomputes the credential on every request, so the
//! server secret is the only trust anchor.

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use super::normalize_device_id;
use crate::error::{Result, TrmnlError};

/// Environment variable holding the server secret.
pub const SECRET_ENV: &str = "SECRET_KEY_BASE";

/// Secret used when the operator does not configure one.
///
/// Anyone who knows a device's MAC address can compute its credential under
/// this secret. Startup logs a warning whenever it is in effect.
pub const DEFAULT_SECRET: &str = "TRMNL";

/// Number of credential hex characters shown in a friendly id.
const FRIENDLY_ID_LEN: usize = 6;

/// Server-held secret mixed into every credential.
#[derive(Clone)]
pub struct ServerSecret {
    value: String,
    is_default: bool,
}

impl ServerSecret {
    /// Use an explicit secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_default: false,
        }
    }

    /// Use the secret if present and non-empty, otherwise [`DEFAULT_SECRET`].
    pub fn resolve(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Self {
                value: DEFAULT_SECRET.to_string(),
                is_default: true,
            },
        }
    }

    /// Read the secret from `SECRET_KEY_BASE`.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(SECRET_ENV).ok())
    }

    /// True when the built-in fallback secret is in use.
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSecret")
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

/// A device access credential (64 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short id shown on the device during registration, e.g. `"3FA-91C"`.
    pub fn friendly_id(&self) -> FriendlyId {
        let head = self.0[..FRIENDLY_ID_LEN].to_ascii_uppercase();
        FriendlyId(format!("{}-{}", &head[..3], &head[3..]))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable derivative of a credential. Carries no authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyId(String);

impl FriendlyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FriendlyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives and checks device credentials under one server secret.
#[derive(Debug, Clone)]
pub struct CredentialDeriver {
    secret: ServerSecret,
}

impl CredentialDeriver {
    pub const fn new(secret: ServerSecret) -> Self {
        Self { secret }
    }

    pub const fn secret_is_default(&self) -> bool {
        self.secret.is_default()
    }

    /// Compute the credential for a device identifier.
    ///
    /// Identifiers are case-insensitive: the normalized form is hashed, so
    /// `aa:bb:..` and `AA:BB:..` share one credential.
    pub fn derive(&self, device_id: &str) -> Result<Credential> {
        let device_id = normalize_device_id(device_id);
        if device_id.is_empty() {
            return Err(TrmnlError::MissingIdentifier);
        }

        let mut hasher = Sha256::new();
        hasher.update(device_id.as_bytes());
        hasher.update(self.secret.value.as_bytes());
        let credential = Credential(hex::encode(hasher.finalize()));

        trace!(device = %device_id, friendly_id = %credential.friendly_id(), "Derived credential");
        Ok(credential)
    }

    /// Check a supplied credential against the one derived for `device_id`.
    pub fn validate(&self, device_id: &str, supplied: &str) -> Result<()> {
        let expected = self.derive(device_id)?;

        if bool::from(expected.as_str().as_bytes().ct_eq(supplied.trim().as_bytes())) {
            Ok(())
        } else {
            debug!(device = %device_id.trim(), "Credential mismatch");
            Err(TrmnlError::UnauthorizedCredential {
                device: device_id.trim().to_string(),
            })
        }
    }

    /// Boolean form of [`validate`](Self::validate).
    pub fn is_valid(&self, device_id: &str, supplied: &str) -> bool {
        self.validate(device_id, supplied).is_ok()
    }
}
