//! Test fixture helpers for creating temporary image trees.
//!
//! The catalog never decodes image data, so fixture files only carry a
//! format signature.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const BMP_SIGNATURE: &[u8] = b"BM";

/// Image files in a temporary directory with automatic cleanup.
///
/// # Example
///
/// ```ignore
/// let images = ImageTree::with_files(&["a.png", "album/b--30.bmp"]);
/// let catalog = Catalog::load(images.path()).unwrap();
/// ```
pub struct ImageTree {
    pub dir: TempDir,
}

impl ImageTree {
    /// Empty image root.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create each relative path, with parent directories as needed.
    #[must_use]
    pub fn with_files(paths: &[&str]) -> Self {
        let tree = Self::empty();
        for path in paths {
            tree.add(path);
        }
        tree
    }

    /// Add one file. Non-image extensions get plain text content.
    pub fn add(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        let contents = match Path::new(relative).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => PNG_SIGNATURE,
            Some(ext) if ext.eq_ignore_ascii_case("bmp") => BMP_SIGNATURE,
            _ => b"not an image".as_slice(),
        };
        fs::write(&path, contents).unwrap_or_else(|_| panic!("Failed to write {path:?}"));
        path
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Write a TOML config file into `dir` and return its path.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("trmnld.toml");
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

/// Bytes of the PNG fixture content, for comparing served files.
#[must_use]
pub fn png_bytes() -> &'static [u8] {
    PNG_SIGNATURE
}
