//! Configuration types for document text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The same struct also carries the
//! capability implementations (document backend, OCR engine, MRZ reader), so
//! tests and embedding applications can swap any of them without touching
//! the reconciliation logic.
//!
//! A config holds no per-document state: sharing one config across
//! concurrent extractions is safe and every call is independently
//! reproducible.

use crate::capability::{DocumentBackend, MrzReader, OcrEngine};
use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for document extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use docfuse::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .min_text_length(120)
///     .ocr_dpi(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Minimum trimmed character count for the text layer to be accepted. Default: 200.
    ///
    /// Below this the whole document is re-read through OCR. The comparison
    /// is inclusive, so `0` never triggers OCR.
    pub min_text_length: usize,

    /// Rasterisation DPI for the OCR pass. Range: 72–600. Default: 200.
    pub ocr_dpi: u32,

    /// Rasterisation DPI for MRZ detection on PDF pages. Range: 72–600. Default: 300.
    ///
    /// MRZ glyphs are small and monospaced; detection needs more pixels than
    /// body-text OCR.
    pub mrz_dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory holding the OCR model files for the built-in engine.
    /// If None, the engine's default cache directory is used.
    pub ocr_model_dir: Option<PathBuf>,

    /// Pre-constructed document backend. If None, pdfium is bound inside
    /// each extraction on the thread that runs it.
    pub backend: Option<Arc<dyn DocumentBackend + Send + Sync>>,

    /// Pre-constructed OCR engine. If None, the built-in engine is loaded the
    /// first time a document actually needs OCR.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// MRZ reader. If None, MRZ detection is treated as unavailable and no
    /// MRZ sections are ever emitted.
    pub mrz_reader: Option<Arc<dyn MrzReader>>,

    /// Optional observer for per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 200,
            ocr_dpi: 200,
            mrz_dpi: 300,
            password: None,
            ocr_model_dir: None,
            backend: None,
            ocr_engine: None,
            mrz_reader: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("min_text_length", &self.min_text_length)
            .field("ocr_dpi", &self.ocr_dpi)
            .field("mrz_dpi", &self.mrz_dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ocr_model_dir", &self.ocr_model_dir)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn DocumentBackend>"))
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("mrz_reader", &self.mrz_reader.as_ref().map(|_| "<dyn MrzReader>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn min_text_length(mut self, n: usize) -> Self {
        self.config.min_text_length = n;
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(72, 600);
        self
    }

    pub fn mrz_dpi(mut self, dpi: u32) -> Self {
        self.config.mrz_dpi = dpi.clamp(72, 600);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn ocr_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.ocr_model_dir = Some(dir.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn DocumentBackend + Send + Sync>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn mrz_reader(mut self, reader: Arc<dyn MrzReader>) -> Self {
        self.config.mrz_reader = Some(reader);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        for (name, dpi) in [("OCR", c.ocr_dpi), ("MRZ", c.mrz_dpi)] {
            if !(72..=600).contains(&dpi) {
                return Err(ExtractError::InvalidConfig(format!(
                    "{name} DPI must be 72–600, got {dpi}"
                )));
            }
        }
        if let Some(ref dir) = c.ocr_model_dir {
            if dir.as_os_str().is_empty() {
                return Err(ExtractError::InvalidConfig(
                    "OCR model directory must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How positioned lines on a page are ordered into reading sequence.
///
/// Chosen per document type, never detected per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Top-to-bottom, then left-to-right. (default)
    #[default]
    SingleColumn,
    /// Left half read fully before the right half.
    TwoColumn,
}

impl FromStr for LayoutMode {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single-column" | "one-column" => Ok(LayoutMode::SingleColumn),
            "two" | "two-column" | "columns" => Ok(LayoutMode::TwoColumn),
            other => Err(ExtractError::InvalidConfig(format!(
                "Unknown layout mode '{other}' (expected 'single' or 'two-column')"
            ))),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::SingleColumn => f.write_str("single-column"),
            LayoutMode::TwoColumn => f.write_str("two-column"),
        }
    }
}
