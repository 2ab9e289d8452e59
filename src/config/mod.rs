//! Server configuration.
//!
//! Values come from built-in defaults, an optional TOML file, and command-line
//! flags (or their environment variables), each layer overriding the previous.
//! The server secret is handled separately, see [`crate::auth::ServerSecret`].

mod file;
mod path;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::auth::{AccessPolicy, Admission};
use crate::error::{Result, TrmnlError};

pub use file::ConfigFile;
pub use path::{PathResolver, home_dir, resolve_path};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Values supplied on the command line. `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub image_dir: Option<PathBuf>,
    pub setup: bool,
    pub public_url: Option<String>,
    pub allowed_devices: Vec<String>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub image_dir: PathBuf,
    /// Base for image URLs; derived from each request when unset.
    pub public_url: Option<String>,
    pub policy: AccessPolicy,
}

impl ServerConfig {
    /// Resolve configuration from the config file (if any) and overrides.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        match overrides.config_file.clone() {
            Some(path) => {
                let file = ConfigFile::load(&path)?;
                let resolver = PathResolver::for_config_file(&path)?;
                Self::merge(file, &resolver, overrides)
            }
            None => Self::merge(ConfigFile::default(), &PathResolver::for_working_dir()?, overrides),
        }
    }

    /// Layer `overrides` over `file`. File paths resolve through `file_paths`,
    /// command-line paths through the working directory.
    pub fn merge(
        file: ConfigFile,
        file_paths: &PathResolver,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let image_dir = match (overrides.image_dir, file.image_dir) {
            (Some(cli), _) => PathResolver::for_working_dir()?.resolve(&cli)?,
            (None, Some(from_file)) => file_paths.resolve(&from_file)?,
            (None, None) => std::env::current_dir()?,
        };

        let bind = overrides
            .bind
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        if bind.trim().is_empty() {
            return Err(TrmnlError::ConfigInvalid("bind address is empty".into()));
        }

        let port = overrides.port.or(file.port).unwrap_or(DEFAULT_PORT);

        let public_url = overrides
            .public_url
            .or(file.public_url)
            .map(|url| normalize_public_url(&url))
            .transpose()?;

        let allowed = if overrides.allowed_devices.is_empty() {
            file.allowed_devices
        } else {
            overrides.allowed_devices
        };

        let setup_enabled = overrides.setup || file.setup.unwrap_or(false);
        let policy = AccessPolicy::new(setup_enabled, Admission::from_ids(allowed));

        let config = Self {
            bind,
            port,
            image_dir,
            public_url,
            policy,
        };
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// `bind:port`, bracketing IPv6 literals.
    pub fn listen_addr(&self) -> String {
        if self.bind.contains(':') && !self.bind.starts_with('[') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }
}

/// Require an http(s) scheme and strip trailing slashes.
fn normalize_public_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(TrmnlError::ConfigInvalid(format!(
            "public URL must start with http:// or https://, got '{url}'"
        )))
    }
}
