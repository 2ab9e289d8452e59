//! trmnld library - image rotation server for TRMNL e-ink displays.
//!
//! This library exposes the core of the `trmnld` binary for use in tests
//! and embedding.
//!
//! # Modules
//!
//! - `auth`: Stateless device credentials and the provisioning policy
//! - `catalog`: Image discovery and per-image display durations
//! - `session`: Per-device rotation cursors
//! - `rotation`: Next-image selection
//! - `app`: Device-facing operations over shared state
//! - `server`: HTTP routes and wire format
//! - `config`: Configuration file and flag layering
#![forbid(unsafe_code)]

pub mod app;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod rotation;
pub mod server;
pub mod session;
