//! Image catalog: the ordered set of images served to devices.
//!
//! The catalog is loaded once at startup and never changes afterwards, so
//! ordinals are stable for the life of the process. Entries are ordered by
//! byte-wise comparison of their relative paths (`img10.png` sorts before
//! `img2.png`).

mod scanner;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

pub use scanner::{CatalogError, IMAGE_EXTENSIONS, is_image_path, scan_images};

/// Display duration used when a file name carries no valid `--<secs>` suffix.
pub const DEFAULT_DURATION_SECS: u32 = 900;

/// Separator between an image name and its duration suffix.
const DURATION_SEPARATOR: &str = "--";

/// A servable image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Path relative to the image root, `/`-separated.
    pub path: String,
    /// Position in catalog order.
    pub ordinal: usize,
    /// How long the device should show this image.
    pub duration_secs: u32,
}

/// Immutable, ordered image catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Scan `root` recursively and build the catalog.
    ///
    /// An empty directory yields an empty catalog, not an error.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn load(root: &Path) -> Result<Self, CatalogError> {
        let paths = scan_images(root)?;
        let catalog = Self::from_paths(root, paths);

        info!(images = catalog.len(), "Image catalog loaded");
        Ok(catalog)
    }

    /// Build a catalog from already-relative image paths.
    pub fn from_paths<I, S>(root: impl Into<PathBuf>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        paths.sort_unstable();
        paths.dedup();

        let entries = paths
            .into_iter()
            .enumerate()
            .map(|(ordinal, path)| {
                let duration_secs = duration_of(&path);
                debug!(ordinal, image = %path, duration_secs, "Catalog entry");
                CatalogEntry {
                    path,
                    ordinal,
                    duration_secs,
                }
            })
            .collect();

        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, ordinal: usize) -> Option<&CatalogEntry> {
        self.entries.get(ordinal)
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display duration encoded in an image name.
///
/// `sunset--45.png` shows for 45 seconds. Only the last `--` segment before
/// the extension counts, and it must be a positive integer; anything else
/// falls back to [`DEFAULT_DURATION_SECS`].
pub fn duration_of(path: &str) -> u32 {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let base = match path[file_start..].rfind('.') {
        Some(dot) => &path[..file_start + dot],
        None => path,
    };

    let mut segments = base.rsplit(DURATION_SEPARATOR);
    let last = segments.next().unwrap_or_default();
    if segments.next().is_none() {
        return DEFAULT_DURATION_SECS;
    }

    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_DURATION_SECS;
    }

    match last.parse::<u32>() {
        Ok(secs) if secs > 0 => secs,
        _ => DEFAULT_DURATION_SECS,
    }
}
