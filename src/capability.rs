//! Narrow interfaces to the external capabilities the engine consumes.
//!
//! The reconciliation logic in [`crate::pipeline`] only ever talks to these
//! traits. Concrete implementations live in [`crate::backend`]; tests swap in
//! deterministic fakes that return fixed spans, widgets and OCR text.
//!
//! ```text
//! DocumentBackend ──open──▶ PagedDocument ──▶ geometry / text spans / widgets / raster
//! OcrEngine       RGB image ──▶ text blob
//! MrzReader       image bytes ──▶ Option<MrzRecord>
//! ```

use crate::error::{ExtractError, MrzError};
use image::{DynamicImage, RgbImage};
use std::fmt;
use std::path::Path;

// ── Raw page data ────────────────────────────────────────────────────────

/// Page rectangle in top-left-origin page units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Left edge of the page box.
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            width,
            height,
        }
    }

    /// Horizontal midpoint used to split two-column pages.
    pub fn mid_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// A run of text from the embedded text layer with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub text: String,
}

/// The value a fillable-field widget currently holds, as stored.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Raw byte strings; decoded permissively.
    Bytes(Vec<u8>),
    /// Multi-select values.
    List(Vec<FieldValue>),
}

/// A fillable-field widget on a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldWidget {
    /// Fully qualified field name.
    pub name: Option<String>,
    /// Alternate (user-facing) field label.
    pub label: Option<String>,
    pub value: Option<FieldValue>,
    /// `(top, left)` of the widget rectangle, when it has one.
    pub anchor: Option<(f64, f64)>,
}

// ── Capabilities ─────────────────────────────────────────────────────────

/// Opens documents for page-by-page reading.
///
/// Not required to be `Send`: a native library binding may be tied to the
/// thread that created it. Backends stored in [`crate::ExtractionConfig`]
/// must additionally be `Send + Sync`.
pub trait DocumentBackend {
    /// Open the document at `path`.
    ///
    /// The opened document may borrow both the backend and the password.
    /// Failure to open is fatal for the document.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PagedDocument + 'a>, ExtractError>;
}

/// An opened paged document. Page indices are 0-based.
///
/// None of the content methods fail on absence of content: an empty page
/// returns empty vectors.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    fn geometry(&self, page: usize) -> Result<PageGeometry, ExtractError>;

    /// Text-layer spans in the backend's content order.
    fn text_spans(&self, page: usize) -> Result<Vec<TextSpan>, ExtractError>;

    /// All fillable-field widgets on the page, filled or not.
    fn widgets(&self, page: usize) -> Result<Vec<FieldWidget>, ExtractError>;

    /// Render the page to an image at `dpi`.
    fn rasterize(&self, page: usize, dpi: u32) -> Result<DynamicImage, ExtractError>;
}

/// Optical character recognition over a 3-channel image.
pub trait OcrEngine: Send + Sync {
    /// Recognise all text in `image`, lines separated by `\n`.
    fn recognize(&self, image: &RgbImage) -> Result<String, ExtractError>;
}

/// Locates and parses a machine-readable zone in an encoded image.
pub trait MrzReader: Send + Sync {
    /// `Ok(None)` means the image holds no detectable MRZ.
    fn read_mrz(&self, image_bytes: &[u8]) -> Result<Option<Box<dyn MrzRecord>>, MrzError>;
}

/// A detected MRZ as reported by a reader.
///
/// `Display` is the reader's own string form, used when no explicit raw text
/// is exposed.
pub trait MrzRecord: fmt::Display + Send {
    fn raw_text(&self) -> Option<String> {
        None
    }

    /// Parsed fields in the reader's mapping order; `None` when structured
    /// conversion is not supported.
    fn fields(&self) -> Option<Vec<(String, String)>> {
        None
    }
}
