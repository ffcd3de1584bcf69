//! Error types for the docfuse library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`]: **Fatal**: the document's body text cannot be
//!   produced (corrupt PDF, unreadable image, OCR required but failing).
//!   Returned as `Err(ExtractError)` from the top-level `extract_*` functions.
//!
//! * [`MrzError`]: **Absorbed**: machine-readable-zone detection failed.
//!   MRZ data is an optional appendix, so the MRZ pipeline converts every
//!   `MrzError` into an empty [`crate::output::MrzResult`] and logs it.
//!   It never reaches the caller of an `extract_*` function.
//!
//! A missing input path is neither: it is a logged no-op that yields an empty
//! result.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docfuse library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF could not be opened or parsed.
    #[error("Document '{path}' is corrupt or unreadable: {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Reading the input file failed after it was found to exist.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Page errors ───────────────────────────────────────────────────────
    /// A page handle could not be obtained.
    #[error("Page {page} is unavailable: {detail}")]
    PageUnavailable { page: usize, detail: String },

    /// The embedded text layer of a page could not be read.
    #[error("Reading the text layer of page {page} failed: {detail}")]
    TextLayerFailed { page: usize, detail: String },

    /// The backend failed to rasterise a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// OCR is required for this document but no engine could be provided.
    #[error("OCR engine is not available: {0}")]
    OcrUnavailable(String),

    /// The OCR engine failed on an image.
    #[error("OCR failed: {0}")]
    OcrFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// MRZ detection failures. Never propagated past the MRZ pipeline.
#[derive(Debug, Clone, Error)]
pub enum MrzError {
    /// The reader could not decode the supplied image bytes.
    #[error("MRZ reader could not decode image: {0}")]
    Decode(String),

    /// The reader's detection step failed.
    #[error("MRZ detection failed: {0}")]
    Detection(String),
}

impl From<ExtractError> for MrzError {
    fn from(e: ExtractError) -> Self {
        MrzError::Detection(e.to_string())
    }
}
