//! Recursive image directory scanning.
//!
//! Walks an image root and collects the paths of servable images relative to
//! that root. Ordering is left to the caller.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

/// Image file extensions accepted into the catalog (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp"];

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The image root does not exist.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The image root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to read a directory.
    #[error("failed to read directory {0}: {1}")]
    ReadError(PathBuf, #[source] io::Error),

    /// Failed to read a directory entry.
    #[error("failed to read directory entry in {0}: {1}")]
    EntryError(PathBuf, #[source] io::Error),
}

/// Returns true if the path has an accepted image extension.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Collects every image under `root` as a `/`-separated path relative to it.
///
/// Symlinked directories are not descended into. Symlinks to regular files are
/// included. Broken symlinks and non-UTF-8 names are skipped with a warning.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn scan_images(root: &Path) -> Result<Vec<String>, CatalogError> {
    if !root.exists() {
        return Err(CatalogError::DirectoryNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(CatalogError::NotADirectory(root.to_path_buf()));
    }

    let mut images = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        trace!(dir = %dir.display(), "Scanning directory");

        let entries = std::fs::read_dir(&dir).map_err(|e| CatalogError::ReadError(dir.clone(), e))?;

        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::EntryError(dir.clone(), e))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| CatalogError::EntryError(dir.clone(), e))?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }

            if !is_image_path(&path) {
                trace!(path = %path.display(), "Skipping non-image file");
                continue;
            }

            if file_type.is_symlink() {
                match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => {}
                    Ok(_) => {
                        debug!(path = %path.display(), "Skipping symlink to non-file");
                        continue;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping broken symlink");
                        continue;
                    }
                }
            }

            match relative_name(root, &path) {
                Some(name) => {
                    trace!(image = %name, "Found image");
                    images.push(name);
                }
                None => warn!(path = %path.display(), "Skipping image with non UTF-8 path"),
            }
        }
    }

    Ok(images)
}

/// Path of `path` relative to `root`, joined with `/`.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
