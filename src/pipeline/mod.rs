//! Pipeline stages for document text reconciliation.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable against fake capabilities.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ sources ──▶ layout ──▶ policy ──▶ sections
//! (kind)    (3 readers)  (order)    (gate)     (+ mrz)
//! ```
//!
//! 1. [`input`]   : existence check and PDF-vs-image detection
//! 2. [`sources`] : text-layer, OCR and form-field-widget lines per page
//! 3. [`layout`]  : single- or two-column reading order
//! 4. [`policy`]  : text layer vs. whole-document OCR fallback
//! 5. [`mrz`]     : backward page scan for the machine-readable zone,
//!    PNG-encoded via [`encode`]
//! 6. [`sections`]: `[MRZ]` / `[MRZ PARSED]` appendices

pub mod encode;
pub mod input;
pub mod layout;
pub mod mrz;
pub mod policy;
pub mod sections;
pub mod sources;
