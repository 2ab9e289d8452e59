//! TOML configuration file.
//!
//! ```toml
//! bind = "0.0.0.0"
//! port = 3000
//! image_dir = "images"          # relative to this file
//! setup = true
//! public_url = "https://trmnl.example.com"
//! allowed_devices = ["AA:BB:CC:DD:EE:FF"]
//! ```
//!
//! Every key is optional. The server secret is deliberately not a file key;
//! it only comes from `SECRET_KEY_BASE`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, TrmnlError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    #[serde(default)]
    pub setup: Option<bool>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub allowed_devices: Vec<String>,
}

impl ConfigFile {
    /// Read and parse a config file.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TrmnlError::ConfigNotFound {
                path: path.display().to_string(),
            },
            _ => TrmnlError::Io(e),
        })?;

        let file = Self::parse(&text)?;
        debug!(?file, "Loaded config file");
        Ok(file)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TrmnlError::ConfigParse(e.to_string()))
    }
}
