//! # docfuse
//!
//! Reconcile the text of PDFs, fillable forms and passport scans into one
//! plain-text result.
//!
//! ## Why this crate?
//!
//! Uploaded documents carry their text in different places. A born-digital
//! PDF has an embedded text layer; a fillable form keeps what the user typed
//! in widget values that plain text extraction never sees; a scan has no text
//! at all. This crate reads every source a page offers, arranges the lines
//! into reading order, falls back to OCR when the embedded text is too thin,
//! and appends the machine-readable zone of identity documents as separate
//! sections.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path
//!  │
//!  ├─ 1. Input    missing? → empty result; PDF or image?
//!  ├─ 2. Sources  text layer + form-field widgets per page (positioned lines)
//!  ├─ 3. Layout   single-column or two-column reading order
//!  ├─ 4. Policy   text layer too short → whole document through OCR
//!  ├─ 5. MRZ      last page first, stop at the first hit
//!  └─ 6. Output   body text + [MRZ] / [MRZ PARSED] sections, used_ocr flag
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docfuse::{extract_form, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().min_text_length(200).build()?;
//!     let result = extract_form("g28.pdf", false, &config)?;
//!     println!("used_ocr={}\n{}", result.used_ocr, result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`     | on  | Enables the `docfuse` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `ocr`     | on  | Built-in [`OcrsEngine`] (pure-Rust `ocrs` + `rten`) |
//! | `bundled` | off | Embed the pdfium shared library at compile time |
//!
//! Without `ocr`, supply an engine through
//! [`ExtractionConfigBuilder::ocr_engine`]; documents that need OCR fail with
//! [`ExtractError::OcrUnavailable`] otherwise.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod backend;
pub mod capability;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::ArtifactLog;
pub use backend::mrz_text::{locate_mrz, MrzFormat, OcrMrzReader, ParsedMrz};
#[cfg(feature = "ocr")]
pub use backend::ocrs::{OcrModelPaths, OcrsEngine};
pub use backend::pdfium::PdfiumBackend;
pub use capability::{
    DocumentBackend, FieldValue, FieldWidget, MrzReader, MrzRecord, OcrEngine, PageGeometry,
    PagedDocument, TextSpan,
};
pub use config::{ExtractionConfig, ExtractionConfigBuilder, LayoutMode};
pub use error::{ExtractError, MrzError};
pub use extract::{
    extract_form, extract_form_async, extract_passport, extract_passport_async, extract_pdf,
    extract_pdf_async,
};
pub use output::{DocumentExtractionResult, MrzResult, PageExtractionResult, PositionedLine};
pub use pipeline::input::DocumentKind;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, PassKind, ProgressCallback};
