//! Environment variable helpers for tests.
#![allow(dead_code)]

use env_lock::{EnvGuard as LockedEnvGuard, lock_env};
use tracing::{instrument, trace};

/// RAII guard to restore environment variables on drop.
///
/// Holding a guard also serializes every other test that touches the
/// environment through this module.
pub struct EnvGuard<'a> {
    _guard: LockedEnvGuard<'a>,
}

impl<'a> EnvGuard<'a> {
    #[must_use]
    #[instrument]
    pub fn set(key: &'a str, value: &str) -> Self {
        trace!(key, value, "Setting env var");
        let guard = lock_env([(key, Some(value))]);
        Self { _guard: guard }
    }

    #[must_use]
    #[instrument]
    pub fn remove(key: &'a str) -> Self {
        trace!(key, "Removing env var");
        let guard = lock_env([(key, None::<&str>)]);
        Self { _guard: guard }
    }
}

#[must_use]
pub fn with_secret(secret: &str) -> EnvGuard<'static> {
    EnvGuard::set("SECRET_KEY_BASE", secret)
}

#[must_use]
pub fn without_secret() -> EnvGuard<'static> {
    EnvGuard::remove("SECRET_KEY_BASE")
}
