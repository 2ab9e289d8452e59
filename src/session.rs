//! Per-device rotation state.
//!
//! Tracks where each device is in the catalog rotation. State lives in memory
//! only and is lost on restart; a device simply starts over from the first
//! image.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::auth::normalize_device_id;

/// Rotation state of a single device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSession {
    /// Ordinal of the image last shown, or `None` before the first display.
    pub cursor: Option<usize>,
    /// When the cursor last moved.
    pub last_update: Option<DateTime<Utc>>,
}

/// Table of device sessions keyed by normalized device identifier.
///
/// Every access takes the table lock, so lookup-or-create is atomic. The
/// read-advance-write cycle of a display request is not; two racing requests
/// for one device leave one of their two cursors behind, both valid.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: RwLock<HashMap<String, DeviceSession>>,
}

impl SessionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Sessions are `Copy` values written in one assignment; a poisoned map is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, DeviceSession>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, DeviceSession>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the device's session, creating an unset one if absent.
    pub fn session_for(&self, device_id: &str) -> DeviceSession {
        let key = normalize_device_id(device_id);
        let mut sessions = self.write();
        let created = !sessions.contains_key(&key);
        let session = *sessions.entry(key).or_default();

        if created {
            debug!(device = %device_id.trim(), "New device session");
        }
        session
    }

    /// Move the device's cursor to `cursor`.
    pub fn advance(&self, device_id: &str, cursor: usize, at: DateTime<Utc>) {
        let key = normalize_device_id(device_id);
        trace!(device = %key, cursor, "Advancing cursor");

        let mut sessions = self.write();
        let session = sessions.entry(key).or_default();
        session.cursor = Some(cursor);
        session.last_update = Some(at);
    }

    /// Look up a session without creating it.
    pub fn get(&self, device_id: &str) -> Option<DeviceSession> {
        self.read().get(&normalize_device_id(device_id)).copied()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of all sessions, ordered by device identifier.
    pub fn snapshot(&self) -> Vec<(String, DeviceSession)> {
        let mut all: Vec<_> = self
            .read()
            .iter()
            .map(|(id, session)| (id.clone(), *session))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
