//! Where configured paths point.
//!
//! A path may be absolute, start with `~` (the home directory), or be
//! relative to a base: the config file's directory for file values, the
//! working directory for command-line values.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TrmnlError};

/// Resolve `path` against `base_dir`, expanding a leading `~`.
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    let resolved = match path.strip_prefix("~") {
        Ok(rest) => home_dir()?.join(rest),
        Err(_) if path.is_absolute() => return Ok(path.to_path_buf()),
        Err(_) => base_dir.join(path),
    };

    debug!(from = %path.display(), to = %resolved.display(), "Resolved path");
    Ok(resolved)
}

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| TrmnlError::ConfigInvalid("cannot determine home directory".into()))
}

/// A base directory for relative paths.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Base on the directory holding `config_path`, canonicalized when possible.
    pub fn for_config_file(config_path: &Path) -> Result<Self> {
        let dir = match config_path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
            Some(dir) => dir,
            None => {
                return Err(TrmnlError::ConfigInvalid(format!(
                    "config path has no parent directory: {}",
                    config_path.display()
                )));
            }
        };

        let base_dir = dir.canonicalize().unwrap_or_else(|e| {
            warn!(dir = %dir.display(), error = %e, "Cannot canonicalize config directory");
            dir.to_path_buf()
        });
        Ok(Self { base_dir })
    }

    pub fn for_working_dir() -> Result<Self> {
        Ok(Self {
            base_dir: std::env::current_dir()?,
        })
    }

    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        resolve_path(path, &self.base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
