//! Quality-gated extraction policy.
//!
//! ## Why a character count?
//!
//! Reading an embedded text layer is cheap; rasterising and recognising every
//! page is not. The policy therefore runs the cheap pass over the whole
//! document first and only when its trimmed length falls below
//! `min_text_length` re-reads the *entire* document through OCR. The OCR
//! result is accepted unconditionally: OCR is the terminal strategy.
//!
//! The decision is made once per document, never per page, and the two
//! passes are never merged.

use crate::capability::{OcrEngine, PagedDocument};
use crate::config::{ExtractionConfig, LayoutMode};
use crate::error::ExtractError;
use crate::output::{DocumentExtractionResult, PageExtractionResult};
use crate::pipeline::{layout, sources};
use crate::progress::PassKind;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a page pass gets its body lines from. Widget lines are always added.
#[derive(Clone, Copy)]
pub enum PageSource<'a> {
    TextLayer,
    Ocr { engine: &'a dyn OcrEngine, dpi: u32 },
}

impl PageSource<'_> {
    pub fn kind(&self) -> PassKind {
        match self {
            PageSource::TextLayer => PassKind::TextLayer,
            PageSource::Ocr { .. } => PassKind::Ocr,
        }
    }
}

/// Aggregate of one pass over every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPass {
    /// Page texts joined with `\n`.
    pub text: String,
    pub total_fields: usize,
    pub filled_fields: usize,
}

/// Read one page: body lines plus widget lines, arranged and joined.
pub fn extract_page(
    doc: &dyn PagedDocument,
    page: usize,
    source: PageSource<'_>,
    mode: LayoutMode,
) -> Result<PageExtractionResult, ExtractError> {
    let mut lines = match source {
        PageSource::TextLayer => sources::text_layer_lines(doc, page)?,
        PageSource::Ocr { engine, dpi } => sources::ocr_lines(doc, page, engine, dpi)?,
    };
    let (field_lines, counts) = sources::field_widget_lines(doc, page)?;
    lines.extend(field_lines);

    let geometry = doc.geometry(page)?;
    let ordered = layout::arrange_lines(lines, &geometry, mode);
    Ok(PageExtractionResult {
        text: layout::join_lines(&ordered),
        total_fields: counts.total,
        filled_fields: counts.filled,
    })
}

/// Run `source` over every page in order.
pub fn run_pass(
    doc: &dyn PagedDocument,
    source: PageSource<'_>,
    mode: LayoutMode,
    config: &ExtractionConfig,
) -> Result<DocumentPass, ExtractError> {
    let total = doc.page_count();
    let mut parts = Vec::with_capacity(total);
    let mut pass = DocumentPass::default();

    for page in 0..total {
        info!(
            "Reading page {}/{} ({} pass, {})",
            page + 1,
            total,
            source.kind(),
            mode
        );
        let result = extract_page(doc, page, source, mode)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page + 1, total, source.kind(), result.text.chars().count());
        }
        pass.total_fields += result.total_fields;
        pass.filled_fields += result.filled_fields;
        parts.push(result.text);
    }

    pass.text = parts.join("\n");
    Ok(pass)
}

/// `true` when a text-layer extraction is long enough to skip OCR.
pub fn is_sufficient(text: &str, min_text_length: usize) -> bool {
    text.trim().chars().count() >= min_text_length
}

/// Extract a document's body text, falling back to OCR when the text layer
/// is too short.
///
/// `resolve_ocr` is only invoked when the fallback fires, so documents with
/// a usable text layer never load an OCR engine.
pub fn extract_with_fallback<F>(
    doc: &dyn PagedDocument,
    mode: LayoutMode,
    config: &ExtractionConfig,
    resolve_ocr: F,
) -> Result<DocumentExtractionResult, ExtractError>
where
    F: FnOnce() -> Result<Arc<dyn OcrEngine>, ExtractError>,
{
    let base = run_pass(doc, PageSource::TextLayer, mode, config)?;
    if base.total_fields > 0 {
        info!(
            "Form fields found: {} total, {} with values",
            base.total_fields, base.filled_fields
        );
    }

    if is_sufficient(&base.text, config.min_text_length) {
        debug!("Text layer accepted ({} chars)", base.text.trim().chars().count());
        return Ok(DocumentExtractionResult {
            text: base.text,
            used_ocr: false,
        });
    }

    let extracted = base.text.trim().chars().count();
    info!(
        "Text layer too short ({} < {}); running OCR",
        extracted, config.min_text_length
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_ocr_fallback(extracted, config.min_text_length);
    }

    let engine = resolve_ocr()?;
    let source = PageSource::Ocr {
        engine: engine.as_ref(),
        dpi: config.ocr_dpi,
    };
    let ocr = run_pass(doc, source, mode, config)?;
    Ok(DocumentExtractionResult {
        text: ocr.text,
        used_ocr: true,
    })
}
