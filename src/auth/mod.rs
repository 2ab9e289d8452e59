//! Device authentication.
//!
//! - `credential`: stateless credential derivation and validation
//! - `policy`: provisioning admission rules

mod credential;
mod policy;

pub use credential::{
    Credential, CredentialDeriver, DEFAULT_SECRET, FriendlyId, SECRET_ENV, ServerSecret,
};
pub use policy::{AccessPolicy, Admission, normalize_device_id};
