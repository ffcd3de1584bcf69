//! Input resolution: decide whether a path exists and what kind of document
//! it holds.
//!
//! A missing path is reported as `None` rather than an error: the upload
//! layer is expected to have validated existence already, and a dangling
//! reference must not crash the engine.
//!
//! Paged documents are recognised by a `.pdf` extension or, failing that, by
//! the `%PDF` magic bytes, so renamed uploads still take the PDF route.
//! Everything else is treated as a standalone image.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// What an input file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A paged document (PDF) read through the document backend.
    Paged,
    /// A single raster image.
    Image,
}

/// Resolve `path` to a [`DocumentKind`].
///
/// Returns `Ok(None)` (and logs a warning) when the path does not exist.
pub fn resolve_kind(path: &Path) -> Result<Option<DocumentKind>, ExtractError> {
    if !path.exists() {
        warn!("Input not found: {}", path.display());
        return Ok(None);
    }

    let kind = if has_pdf_extension(path) || has_pdf_magic(path)? {
        DocumentKind::Paged
    } else {
        DocumentKind::Image
    };
    debug!("Resolved {} as {:?}", path.display(), kind);
    Ok(Some(kind))
}

/// Check whether `path` ends in `.pdf` (any case).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn has_pdf_magic(path: &Path) -> Result<bool, ExtractError> {
    let mut f = std::fs::File::open(path).map_err(|e| ExtractError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut magic = [0u8; 4];
    Ok(f.read_exact(&mut magic).is_ok() && &magic == b"%PDF")
}
