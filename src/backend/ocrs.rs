//! Built-in OCR engine backed by the pure-Rust `ocrs` crate.
//!
//! Only compiled with the `ocr` feature. The engine needs two model files,
//! `text-detection.rten` and `text-recognition.rten`, looked up in the
//! configured directory or in `$XDG_CACHE_HOME/ocrs` (`~/.cache/ocrs`), the
//! location `ocrs-cli` downloads them to.
//!
//! Model loading is the expensive step, so the engine is only constructed
//! once a document actually needs OCR. `ocrs` and `rten` are very slow in
//! debug builds.

use crate::capability::OcrEngine;
use crate::error::ExtractError;
use image::RgbImage;
use ::ocrs::{ImageSource, OcrEngine as Ocrs, OcrEngineParams};
use rten::Model;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrModelPaths {
    pub detection: PathBuf,
    pub recognition: PathBuf,
}

impl Default for OcrModelPaths {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrModelPaths {
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection: dir.join(DETECTION_MODEL_FILENAME),
            recognition: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    fn validate(&self) -> Result<(), ExtractError> {
        for (kind, path) in [("detection", &self.detection), ("recognition", &self.recognition)] {
            if !path.exists() {
                return Err(ExtractError::OcrUnavailable(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// [`OcrEngine`] over an `ocrs` engine with loaded models.
pub struct OcrsEngine {
    engine: Ocrs,
}

impl OcrsEngine {
    /// Load both models and initialise the engine.
    pub fn new(paths: &OcrModelPaths) -> Result<Self, ExtractError> {
        paths.validate()?;

        info!("Loading OCR models from {}", paths.detection.display());
        let detection_model = load_model(&paths.detection)?;
        let recognition_model = load_model(&paths.recognition)?;

        let engine = Ocrs::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|e| ExtractError::OcrUnavailable(format!("failed to initialise OCR engine: {e}")))?;

        Ok(Self { engine })
    }

    /// Load models from `dir`, or the default cache directory when `None`.
    pub fn from_model_dir(dir: Option<&Path>) -> Result<Self, ExtractError> {
        let paths = dir.map(OcrModelPaths::from_dir).unwrap_or_default();
        Self::new(&paths)
    }
}

fn load_model(path: &Path) -> Result<Model, ExtractError> {
    Model::load_file(path).map_err(|e| {
        ExtractError::OcrUnavailable(format!("failed to load model {}: {e}", path.display()))
    })
}

impl OcrEngine for OcrsEngine {
    fn recognize(&self, image: &RgbImage) -> Result<String, ExtractError> {
        let (width, height) = image.dimensions();
        let source = ImageSource::from_bytes(image.as_raw(), (width, height)).map_err(|e| {
            ExtractError::OcrFailed(format!("image source ({width}x{height}): {e}"))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| ExtractError::OcrFailed(format!("preprocessing: {e}")))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|e| ExtractError::OcrFailed(format!("recognition: {e}")))?;
        debug!(lines = text.lines().count(), chars = text.len(), "OCR complete");
        Ok(text)
    }
}
