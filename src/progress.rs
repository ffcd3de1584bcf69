//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events while a document is read. The callback is purely observational:
//! nothing it does can change the extraction result.
//!
//! # Example
//!
//! ```rust
//! use docfuse::{ExtractionConfig, ExtractionProgressCallback, PassKind};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for PageCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total: usize, _pass: PassKind, _chars: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(PageCounter { pages: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which page pass produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassKind {
    /// Embedded text layer plus form-field widgets.
    TextLayer,
    /// Rasterise-and-recognise plus form-field widgets.
    Ocr,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::TextLayer => f.write_str("text-layer"),
            PassKind::Ocr => f.write_str("ocr"),
        }
    }
}

/// Called by the engine as it processes a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Extraction is single-threaded, but the trait is
/// `Send + Sync` so one callback can be shared by concurrent extractions.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once a paged document has been opened.
    fn on_document_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been read and arranged.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: total pages in the document
    /// * `pass`       : which pass read the page
    /// * `chars`      : character count of the arranged page text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, pass: PassKind, chars: usize) {
        let _ = (page_num, total_pages, pass, chars);
    }

    /// Called when the text layer was too short and OCR takes over.
    fn on_ocr_fallback(&self, extracted_chars: usize, threshold: usize) {
        let _ = (extracted_chars, threshold);
    }

    /// Called when an MRZ was found. `page_num` is `None` for images.
    fn on_mrz_detected(&self, page_num: Option<usize>) {
        let _ = page_num;
    }

    /// Called once with the final result shape.
    fn on_document_complete(&self, used_ocr: bool, chars: usize) {
        let _ = (used_ocr, chars);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        pages: AtomicUsize,
        fallbacks: AtomicUsize,
        passes: Mutex<Vec<PassKind>>,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page_complete(&self, _page_num: usize, _total: usize, pass: PassKind, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
            self.passes.lock().unwrap().push(pass);
        }

        fn on_ocr_fallback(&self, _extracted_chars: usize, _threshold: usize) {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_document_start(2);
        cb.on_page_complete(1, 2, PassKind::TextLayer, 10);
        cb.on_ocr_fallback(10, 200);
        cb.on_mrz_detected(Some(2));
        cb.on_document_complete(true, 300);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_page_complete(1, 2, PassKind::TextLayer, 5);
        tracker.on_ocr_fallback(5, 200);
        tracker.on_page_complete(1, 2, PassKind::Ocr, 400);

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(
            *tracker.passes.lock().unwrap(),
            vec![PassKind::TextLayer, PassKind::Ocr]
        );
    }

    #[test]
    fn pass_kind_display() {
        assert_eq!(PassKind::TextLayer.to_string(), "text-layer");
        assert_eq!(PassKind::Ocr.to_string(), "ocr");
    }
}
