//! Document-level entry points.
//!
//! ## Why synchronous?
//!
//! One extraction is strictly page-serial: the text-layer pass, the optional
//! OCR pass and the MRZ scan each walk the pages in order and nothing is
//! shared between documents. The core is therefore plain blocking code, and
//! the `*_async` wrappers move a whole extraction onto tokio's blocking pool
//! the same way pdfium rendering is kept off async worker threads.
//!
//! ## Routing
//!
//! ```text
//! extract_form      ──▶ extract_pdf(two-column)
//! extract_pdf       ──▶ text layer ─(too short)─▶ OCR ─▶ [MRZ backward scan]
//! extract_passport  ─┬─ PDF   ──▶ extract_pdf(single-column, MRZ on)
//!                    └─ image ──▶ OCR ─▶ MRZ on the image bytes
//! ```

use crate::backend::pdfium::PdfiumBackend;
use crate::capability::{DocumentBackend, OcrEngine, PageGeometry};
use crate::config::{ExtractionConfig, LayoutMode};
use crate::error::ExtractError;
use crate::output::DocumentExtractionResult;
use crate::pipeline::input::{self, DocumentKind};
use crate::pipeline::{layout, mrz, policy, sections, sources};
use crate::progress::PassKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract a fillable form: two-column layout, MRZ only on request.
pub fn extract_form(
    path: impl AsRef<Path>,
    include_mrz: bool,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    extract_pdf(path, LayoutMode::TwoColumn, include_mrz, config)
}

/// Extract a paged document with the caller's layout mode.
///
/// Runs the text-layer pass, falls back to whole-document OCR when the text
/// is shorter than [`ExtractionConfig::min_text_length`], and appends the
/// `[MRZ]` / `[MRZ PARSED]` sections when `include_mrz` is set and a zone is
/// found.
///
/// # Errors
/// Fatal document errors only: unopenable PDF, a page the backend cannot
/// provide, OCR required but unavailable or failing. MRZ problems never
/// surface here. A missing path is not an error and yields an empty result.
pub fn extract_pdf(
    path: impl AsRef<Path>,
    layout: LayoutMode,
    include_mrz: bool,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let path = path.as_ref();
    if input::resolve_kind(path)?.is_none() {
        return Ok(DocumentExtractionResult::empty());
    }
    info!("Extracting {} ({}, mrz={})", path.display(), layout, include_mrz);
    extract_paged(path, layout, include_mrz, config)
}

/// Extract an identity document, which may be a PDF or a single image.
///
/// PDFs take the single-column policy with the MRZ scan always on. Images
/// are OCR-only (`used_ocr` is always `true`) with the MRZ read from the
/// original image bytes.
pub fn extract_passport(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let path = path.as_ref();
    match input::resolve_kind(path)? {
        None => Ok(DocumentExtractionResult::empty()),
        Some(DocumentKind::Paged) => {
            info!("Extracting passport PDF {}", path.display());
            extract_paged(path, LayoutMode::SingleColumn, true, config)
        }
        Some(DocumentKind::Image) => {
            info!("Extracting passport image {}", path.display());
            extract_image(path, config)
        }
    }
}

// ── Async wrappers ───────────────────────────────────────────────────────

/// [`extract_form`] on tokio's blocking pool.
pub async fn extract_form_async(
    path: impl Into<PathBuf>,
    include_mrz: bool,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let path = path.into();
    let config = config.clone();
    run_blocking(move || extract_form(&path, include_mrz, &config)).await
}

/// [`extract_pdf`] on tokio's blocking pool.
pub async fn extract_pdf_async(
    path: impl Into<PathBuf>,
    layout: LayoutMode,
    include_mrz: bool,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let path = path.into();
    let config = config.clone();
    run_blocking(move || extract_pdf(&path, layout, include_mrz, &config)).await
}

/// [`extract_passport`] on tokio's blocking pool.
pub async fn extract_passport_async(
    path: impl Into<PathBuf>,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let path = path.into();
    let config = config.clone();
    run_blocking(move || extract_passport(&path, &config)).await
}

async fn run_blocking<F>(f: F) -> Result<DocumentExtractionResult, ExtractError>
where
    F: FnOnce() -> Result<DocumentExtractionResult, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {e}")))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn extract_paged(
    path: &Path,
    layout: LayoutMode,
    include_mrz: bool,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let start = Instant::now();
    let bound;
    let backend: &dyn DocumentBackend = match config.backend {
        Some(ref backend) => backend.as_ref(),
        None => {
            bound = PdfiumBackend::bind()?;
            &bound
        }
    };
    let doc = backend.open(path, config.password.as_deref())?;
    let total_pages = doc.page_count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(total_pages);
    }

    let mut result =
        policy::extract_with_fallback(doc.as_ref(), layout, config, || resolve_ocr(config))?;

    if include_mrz {
        let label = path.display().to_string();
        let found = mrz::scan_document(
            config.mrz_reader.as_deref(),
            doc.as_ref(),
            config.mrz_dpi,
            &label,
            config.progress_callback.as_ref(),
        );
        result.text = sections::append_mrz(result.text, &found);
    }

    finish(&result, total_pages, start, config);
    Ok(result)
}

fn extract_image(
    path: &Path,
    config: &ExtractionConfig,
) -> Result<DocumentExtractionResult, ExtractError> {
    let start = Instant::now();
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(1);
    }

    // An undecodable image has no OCR text, but the MRZ reader still gets
    // the raw bytes.
    let body = match image::load_from_memory(&bytes) {
        Ok(image) => ocr_image(&image.to_rgb8(), config)?,
        Err(e) => {
            warn!("Could not decode image {}: {}", path.display(), e);
            String::new()
        }
    };
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_complete(1, 1, PassKind::Ocr, body.chars().count());
    }

    let label = path.display().to_string();
    let found = mrz::scan_image(
        config.mrz_reader.as_deref(),
        &bytes,
        &label,
        config.progress_callback.as_ref(),
    );
    let result = DocumentExtractionResult {
        text: sections::append_mrz(body, &found),
        used_ocr: true,
    };

    finish(&result, 1, start, config);
    Ok(result)
}

/// OCR a whole image and arrange its lines top to bottom.
fn ocr_image(rgb: &RgbImage, config: &ExtractionConfig) -> Result<String, ExtractError> {
    let engine = resolve_ocr(config)?;
    debug!("OCR on {}x{} px image", rgb.width(), rgb.height());
    let ocr_text = engine.recognize(rgb)?;

    let geometry = PageGeometry::new(f64::from(rgb.width()), f64::from(rgb.height()));
    let lines = sources::synthesize_positions(&ocr_text, geometry.left, geometry.height);
    let ordered = layout::arrange_lines(lines, &geometry, LayoutMode::SingleColumn);
    Ok(layout::join_lines(&ordered))
}

fn finish(
    result: &DocumentExtractionResult,
    pages: usize,
    start: Instant,
    config: &ExtractionConfig,
) {
    let chars = result.text.chars().count();
    info!(
        "Extraction complete: {} pages, {} chars, used_ocr={} in {}ms",
        pages,
        chars,
        result.used_ocr,
        start.elapsed().as_millis()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(result.used_ocr, chars);
    }
}

/// The configured OCR engine, else the built-in one.
///
/// Only called once OCR is actually needed, so model loading is skipped for
/// documents with a usable text layer.
fn resolve_ocr(config: &ExtractionConfig) -> Result<Arc<dyn OcrEngine>, ExtractError> {
    if let Some(ref engine) = config.ocr_engine {
        return Ok(Arc::clone(engine));
    }
    builtin_ocr(config)
}

#[cfg(feature = "ocr")]
fn builtin_ocr(config: &ExtractionConfig) -> Result<Arc<dyn OcrEngine>, ExtractError> {
    let engine = crate::backend::ocrs::OcrsEngine::from_model_dir(config.ocr_model_dir.as_deref())?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "ocr"))]
fn builtin_ocr(_config: &ExtractionConfig) -> Result<Arc<dyn OcrEngine>, ExtractError> {
    Err(ExtractError::OcrUnavailable(
        "no OCR engine configured and the `ocr` feature is disabled".into(),
    ))
}
