//! Provisioning policy: who may obtain a credential.
//!
//! The policy applies to `/api/setup` only. Display requests are gated by the
//! credential alone, so a device outside the allow-list that already holds a
//! valid credential (or can compute one) is still served.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info};

use crate::error::{Result, TrmnlError};

/// Canonical form of a device identifier for lookups: trimmed, upper-case.
pub fn normalize_device_id(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Which devices are admitted at provisioning time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Admission {
    /// Any device that asks receives a credential.
    #[default]
    Open,
    /// Only the listed (normalized) identifiers receive a credential.
    AllowList(BTreeSet<String>),
}

impl Admission {
    /// Build an admission rule from configured identifiers.
    ///
    /// No identifiers means open admission.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = ids
            .into_iter()
            .map(|id| normalize_device_id(id.as_ref()))
            .filter(|id| !id.is_empty())
            .collect();

        if set.is_empty() {
            Self::Open
        } else {
            Self::AllowList(set)
        }
    }

    pub fn admits(&self, device_id: &str) -> bool {
        match self {
            Self::Open => true,
            Self::AllowList(set) => set.contains(&normalize_device_id(device_id)),
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::AllowList(set) => write!(f, "allow-list ({} devices)", set.len()),
        }
    }
}

/// Provisioning rules for the setup endpoint.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub setup_enabled: bool,
    pub admission: Admission,
}

impl AccessPolicy {
    pub const fn new(setup_enabled: bool, admission: Admission) -> Self {
        Self {
            setup_enabled,
            admission,
        }
    }

    /// Decide whether `device_id` may be provisioned.
    ///
    /// Checks run in order: identifier present, setup enabled, device admitted.
    pub fn check_provisioning(&self, device_id: &str) -> Result<()> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(TrmnlError::MissingIdentifier);
        }

        if !self.setup_enabled {
            info!(device = %device_id, "Setup attempt denied - provisioning disabled");
            return Err(TrmnlError::SetupDisabled);
        }

        if !self.admission.admits(device_id) {
            info!(device = %device_id, "Setup attempt denied - device not on allow-list");
            return Err(TrmnlError::DeviceNotAllowed {
                device: device_id.to_string(),
            });
        }

        debug!(device = %device_id, admission = %self.admission, "Device admitted");
        Ok(())
    }
}
