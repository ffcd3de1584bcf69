//! MRZ pipeline: locate a machine-readable zone and render it as text.
//!
//! ## Why scan backwards?
//!
//! Identity documents conventionally carry the MRZ on the photo page, which
//! is usually the last page of a scan. Scanning from the last page towards
//! the first finds it in one step in the common case; the first page that
//! yields a non-empty MRZ wins and no earlier page is examined.
//!
//! ## Why swallow every error?
//!
//! MRZ data is an appendix to the body text. A missing reader, an
//! undecodable image, or a page that fails to rasterise must never fail the
//! document, so every failure here collapses into an empty [`MrzResult`]
//! and a log line.

use crate::capability::{MrzReader, MrzRecord, PagedDocument};
use crate::error::MrzError;
use crate::output::MrzResult;
use crate::pipeline::encode;
use crate::progress::ProgressCallback;
use tracing::{info, warn};

/// Read the MRZ from encoded image bytes.
pub fn scan_image(
    reader: Option<&dyn MrzReader>,
    image_bytes: &[u8],
    label: &str,
    progress: Option<&ProgressCallback>,
) -> MrzResult {
    let Some(reader) = reader else {
        warn!("MRZ reader not available; skipping MRZ detection ({label})");
        return MrzResult::default();
    };

    match reader.read_mrz(image_bytes) {
        Ok(Some(record)) => {
            let result = render_record(record.as_ref());
            if result.raw_text.is_empty() {
                info!("MRZ not detected ({label})");
            } else {
                info!("MRZ detected ({label})");
                if let Some(cb) = progress {
                    cb.on_mrz_detected(None);
                }
            }
            result
        }
        Ok(None) => {
            info!("MRZ not detected ({label})");
            MrzResult::default()
        }
        Err(e) => {
            warn!("MRZ detection failed: {label} ({e})");
            MrzResult::default()
        }
    }
}

/// Scan a paged document from the last page to the first.
pub fn scan_document(
    reader: Option<&dyn MrzReader>,
    doc: &dyn PagedDocument,
    dpi: u32,
    label: &str,
    progress: Option<&ProgressCallback>,
) -> MrzResult {
    let Some(reader) = reader else {
        warn!("MRZ reader not available; skipping MRZ detection ({label})");
        return MrzResult::default();
    };

    match scan_pages_backwards(reader, doc, dpi) {
        Ok(Some((page, result))) => {
            info!("MRZ detected on page {} ({label})", page + 1);
            if let Some(cb) = progress {
                cb.on_mrz_detected(Some(page + 1));
            }
            result
        }
        Ok(None) => {
            info!("MRZ not detected ({label})");
            MrzResult::default()
        }
        Err(e) => {
            warn!("MRZ detection failed: {label} ({e})");
            MrzResult::default()
        }
    }
}

/// Returns the 0-based page index and rendering of the first hit.
///
/// Any error aborts the whole scan: a page that cannot be rasterised at
/// detection resolution is treated like an unavailable reader.
fn scan_pages_backwards(
    reader: &dyn MrzReader,
    doc: &dyn PagedDocument,
    dpi: u32,
) -> Result<Option<(usize, MrzResult)>, MrzError> {
    for page in (0..doc.page_count()).rev() {
        let image = doc.rasterize(page, dpi)?;
        let bytes = encode::encode_png(&image).map_err(|e| MrzError::Decode(e.to_string()))?;
        let Some(record) = reader.read_mrz(&bytes)? else {
            continue;
        };
        let result = render_record(record.as_ref());
        if !result.raw_text.is_empty() {
            return Ok(Some((page, result)));
        }
    }
    Ok(None)
}

/// Build both textual renderings of a detected record.
pub fn render_record(record: &dyn MrzRecord) -> MrzResult {
    MrzResult {
        raw_text: raw_text(record),
        parsed_text: parsed_text(record),
    }
}

/// The record's explicit raw text when exposed and non-blank, else its
/// `Display` form; trimmed.
pub fn raw_text(record: &dyn MrzRecord) -> String {
    match record.raw_text() {
        Some(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
        _ => record.to_string().trim().to_string(),
    }
}

/// `"key: value"` per line in field order; empty without structured fields.
pub fn parsed_text(record: &dyn MrzRecord) -> String {
    record
        .fields()
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}
