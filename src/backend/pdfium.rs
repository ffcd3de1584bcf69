//! pdfium-backed document capability: text spans, form widgets, rasterisation.
//!
//! pdfium reports coordinates in PDF points with the origin at the
//! bottom-left of the page. Everything leaving this module is flipped to a
//! top-left origin so the arrangement step can sort by ascending `y`.
//!
//! The library is bound through `pdfium-auto`, which honours
//! `PDFIUM_LIB_PATH` and otherwise downloads and caches a platform build on
//! first use.
//!
//! ## Why no `Send`?
//!
//! A bound [`Pdfium`] wraps library bindings that may not cross threads, and
//! every [`PdfDocument`] borrows them. A [`PdfiumBackend`] is therefore bound
//! on the thread that reads the document, inside the blocking extraction
//! call, and dropped with it.

use crate::capability::{
    DocumentBackend, FieldValue, FieldWidget, PageGeometry, PagedDocument, TextSpan,
};
use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// [`DocumentBackend`] over a bound pdfium library.
///
/// Not `Send`: bind one per extraction on the thread that uses it.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to pdfium, downloading it on first use when needed.
    pub fn bind() -> Result<Self, ExtractError> {
        let pdfium = pdfium_auto::bind_pdfium_silent()
            .map_err(|e| ExtractError::PdfiumBindingFailed(e.to_string()))?;
        Ok(Self { pdfium })
    }

    /// Wrap an already bound pdfium instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl DocumentBackend for PdfiumBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PagedDocument + 'a>, ExtractError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_open_error(path, password, e))?;
        info!("PDF loaded: {} pages ({})", document.pages().len(), path.display());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

fn classify_open_error(path: &Path, password: Option<&str>, e: PdfiumError) -> ExtractError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            ExtractError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            ExtractError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        ExtractError::CorruptDocument {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>, ExtractError> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| ExtractError::PageUnavailable {
                page: index + 1,
                detail: format!("{:?}", e),
            })
    }
}

impl PagedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn geometry(&self, index: usize) -> Result<PageGeometry, ExtractError> {
        let page = self.page(index)?;
        Ok(box_geometry(&page_box(&page)))
    }

    fn text_spans(&self, index: usize) -> Result<Vec<TextSpan>, ExtractError> {
        let page = self.page(index)?;
        let flip = page_box(&page).top().value;
        let text = page.text().map_err(|e| ExtractError::TextLayerFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        })?;

        let spans: Vec<TextSpan> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                TextSpan {
                    top: f64::from(flip - bounds.top().value),
                    bottom: f64::from(flip - bounds.bottom().value),
                    left: f64::from(bounds.left().value),
                    right: f64::from(bounds.right().value),
                    text: segment.text(),
                }
            })
            .collect();
        debug!("Page {}: {} text segments", index + 1, spans.len());
        Ok(spans)
    }

    fn widgets(&self, index: usize) -> Result<Vec<FieldWidget>, ExtractError> {
        let page = self.page(index)?;
        let flip = page_box(&page).top().value;
        let mut widgets = Vec::new();

        for annotation in page.annotations().iter() {
            let Some(field) = annotation.as_form_field() else {
                continue;
            };
            let anchor = annotation
                .bounds()
                .ok()
                .map(|r| (f64::from(flip - r.top().value), f64::from(r.left().value)));
            widgets.push(FieldWidget {
                name: field.name(),
                label: None,
                value: field_value(field),
                anchor,
            });
        }
        Ok(widgets)
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<DynamicImage, ExtractError> {
        let page = self.page(index)?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ExtractError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px @ {} DPI",
            index + 1,
            image.width(),
            image.height(),
            dpi
        );
        Ok(image)
    }
}

// ── Page box ─────────────────────────────────────────────────────────────

/// The visible page rectangle in PDF user space: the crop box, else the
/// media box, else `0,0` to the page size.
fn page_box(page: &PdfPage) -> PdfRect {
    let boundaries = page.boundaries();
    boundaries
        .crop()
        .or_else(|_| boundaries.media())
        .map(|b| b.bounds)
        .unwrap_or_else(|_| {
            PdfRect::new_from_values(0.0, 0.0, page.height().value, page.width().value)
        })
}

/// Page geometry keeping the box's left edge, so the column split follows
/// pages whose box does not start at `x = 0`.
fn box_geometry(rect: &PdfRect) -> PageGeometry {
    PageGeometry {
        left: f64::from(rect.left().value),
        width: f64::from(rect.width().value),
        height: f64::from(rect.height().value),
    }
}

/// Current value of a form field as stored in the document.
///
/// Check boxes and radio buttons report their on/off state names.
fn field_value(field: &PdfFormField) -> Option<FieldValue> {
    let state = |checked: Result<bool, PdfiumError>| {
        let on = checked.unwrap_or(false);
        Some(FieldValue::Text(if on { "Yes" } else { "Off" }.to_string()))
    };
    match field {
        PdfFormField::Text(f) => f.value().map(FieldValue::Text),
        PdfFormField::ComboBox(f) => f.value().map(FieldValue::Text),
        PdfFormField::ListBox(f) => f.value().map(FieldValue::Text),
        PdfFormField::Checkbox(f) => state(f.is_checked()),
        PdfFormField::RadioButton(f) => state(f.is_checked()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_keeps_offset_box_origin() {
        let rect = PdfRect::new_from_values(20.0, 36.0, 812.0, 648.0);
        let g = box_geometry(&rect);
        assert_eq!(g.left, 36.0);
        assert_eq!(g.width, 612.0);
        assert_eq!(g.height, 792.0);
        assert_eq!(g.mid_x(), 342.0);
    }

    #[test]
    fn password_errors_are_classified_by_whether_one_was_given() {
        let path = Path::new("locked.pdf");
        let password_error =
            || PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError);

        assert!(matches!(
            classify_open_error(path, None, password_error()),
            ExtractError::PasswordRequired { .. }
        ));
        assert!(matches!(
            classify_open_error(path, Some("hunter2"), password_error()),
            ExtractError::WrongPassword { .. }
        ));
    }

    #[test]
    fn other_open_errors_are_corrupt_documents() {
        let err = classify_open_error(
            Path::new("broken.pdf"),
            None,
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError),
        );
        match err {
            ExtractError::CorruptDocument { path, detail } => {
                assert_eq!(path, Path::new("broken.pdf"));
                assert!(detail.contains("FormatError"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
