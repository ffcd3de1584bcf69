//! Concrete capability implementations.
//!
//! | Module | Implements |
//! |--------|------------|
//! | [`pdfium`] | `DocumentBackend` / `PagedDocument` via pdfium-render |
//! | `ocrs` | `OcrEngine` via the pure-Rust `ocrs` crate (feature `ocr`) |
//! | [`mrz_text`] | `MrzReader` over any `OcrEngine` |

pub mod mrz_text;
#[cfg(feature = "ocr")]
pub mod ocrs;
pub mod pdfium;
