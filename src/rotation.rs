//! Rotation engine: picks the next image for a device.
//!
//! Each device walks the catalog in order, one image per display request, and
//! wraps back to the first image after the last. There is no shared rotation
//! state between devices.

use serde::Serialize;
use tracing::trace;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, TrmnlError};

/// The image a device should show next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rotation<'a> {
    pub entry: &'a CatalogEntry,
    /// New cursor value to store for the device.
    pub ordinal: usize,
    pub duration_secs: u32,
}

/// Ordinal following `cursor` in a catalog of `len` entries.
///
/// Unset cursors and cursors at (or past) the last ordinal wrap to 0. Callers
/// must ensure `len > 0`.
pub const fn next_ordinal(cursor: Option<usize>, len: usize) -> usize {
    match cursor {
        Some(current) if current < len.saturating_sub(1) => current + 1,
        _ => 0,
    }
}

/// Advance `cursor` through `catalog`.
///
/// Pure: the caller persists the returned ordinal.
pub fn next(cursor: Option<usize>, catalog: &Catalog) -> Result<Rotation<'_>> {
    if catalog.is_empty() {
        return Err(TrmnlError::EmptyCatalog);
    }

    let ordinal = next_ordinal(cursor, catalog.len());
    let entry = catalog.get(ordinal).ok_or(TrmnlError::EmptyCatalog)?;

    trace!(?cursor, ordinal, image = %entry.path, "Rotated");
    Ok(Rotation {
        entry,
        ordinal,
        duration_secs: entry.duration_secs,
    })
}
