//! Integration tests for the reconciliation engine.
//!
//! Every capability is replaced by a deterministic fake, so these run without
//! pdfium, OCR models or network access. Fake pages rasterise to an image
//! whose width is `page_index + 1`; the fake OCR engine and MRZ reader use
//! that width to know which page they were handed.

use docfuse::{
    extract_form, extract_form_async, extract_passport, extract_passport_async, extract_pdf,
    extract_pdf_async, locate_mrz, DocumentBackend, DocumentExtractionResult, ExtractError, ExtractionConfig,
    ExtractionProgressCallback, FieldValue, FieldWidget, LayoutMode, MrzError, MrzReader,
    MrzRecord, OcrEngine, PageGeometry, PagedDocument, PassKind, TextSpan,
};
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const MRZ_L1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
const MRZ_L2: &str = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct FakePage {
    spans: Vec<TextSpan>,
    widgets: Vec<FieldWidget>,
}

fn span(top: f64, left: f64, text: &str) -> TextSpan {
    TextSpan {
        top,
        bottom: top + 10.0,
        left,
        right: left + 6.0 * text.len() as f64,
        text: text.to_string(),
    }
}

fn text_page(lines: &[&str]) -> FakePage {
    FakePage {
        spans: lines
            .iter()
            .enumerate()
            .map(|(i, l)| span(100.0 + 20.0 * i as f64, 72.0, l))
            .collect(),
        widgets: Vec::new(),
    }
}

#[derive(Default)]
struct FakeBackend {
    pages: Vec<FakePage>,
    passwords: Mutex<Vec<Option<String>>>,
}

impl FakeBackend {
    fn new(pages: Vec<FakePage>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            passwords: Mutex::new(Vec::new()),
        })
    }
}

struct FakeDocument<'a> {
    pages: &'a [FakePage],
}

impl DocumentBackend for FakeBackend {
    fn open<'a>(
        &'a self,
        _path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PagedDocument + 'a>, ExtractError> {
        self.passwords
            .lock()
            .unwrap()
            .push(password.map(str::to_string));
        Ok(Box::new(FakeDocument { pages: &self.pages }))
    }
}

impl PagedDocument for FakeDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn geometry(&self, _page: usize) -> Result<PageGeometry, ExtractError> {
        Ok(PageGeometry::new(612.0, 792.0))
    }

    fn text_spans(&self, page: usize) -> Result<Vec<TextSpan>, ExtractError> {
        Ok(self.pages[page].spans.clone())
    }

    fn widgets(&self, page: usize) -> Result<Vec<FieldWidget>, ExtractError> {
        Ok(self.pages[page].widgets.clone())
    }

    fn rasterize(&self, page: usize, _dpi: u32) -> Result<DynamicImage, ExtractError> {
        Ok(DynamicImage::new_rgb8(page as u32 + 1, 4))
    }
}

/// Returns `texts[width - 1]` for each image.
struct FakeOcr {
    texts: Vec<String>,
    calls: AtomicUsize,
}

impl FakeOcr {
    fn new(texts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, image: &RgbImage) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = image.width() as usize - 1;
        Ok(self.texts.get(idx).cloned().unwrap_or_default())
    }
}

/// Finds the specimen MRZ only on the image of width `hit + 1`.
struct FakeMrzReader {
    hit: Option<usize>,
    seen: Mutex<Vec<usize>>,
}

impl FakeMrzReader {
    fn new(hit: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            hit,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

impl MrzReader for FakeMrzReader {
    fn read_mrz(&self, image_bytes: &[u8]) -> Result<Option<Box<dyn MrzRecord>>, MrzError> {
        let image =
            image::load_from_memory(image_bytes).map_err(|e| MrzError::Decode(e.to_string()))?;
        let idx = image.width() as usize - 1;
        self.seen.lock().unwrap().push(idx);
        if self.hit != Some(idx) {
            return Ok(None);
        }
        let record = locate_mrz(&format!("{MRZ_L1}\n{MRZ_L2}"))
            .ok_or_else(|| MrzError::Detection("specimen did not parse".into()))?;
        Ok(Some(Box::new(record) as Box<dyn MrzRecord>))
    }
}

struct FailingMrzReader;

impl MrzReader for FailingMrzReader {
    fn read_mrz(&self, _image_bytes: &[u8]) -> Result<Option<Box<dyn MrzRecord>>, MrzError> {
        Err(MrzError::Detection("reader crashed".into()))
    }
}

#[derive(Default)]
struct RecordingProgress {
    pages: Mutex<Vec<(usize, PassKind)>>,
    fallbacks: AtomicUsize,
    mrz_pages: Mutex<Vec<Option<usize>>>,
    completed: AtomicUsize,
}

impl ExtractionProgressCallback for RecordingProgress {
    fn on_page_complete(&self, page_num: usize, _total: usize, pass: PassKind, _chars: usize) {
        self.pages.lock().unwrap().push((page_num, pass));
    }

    fn on_ocr_fallback(&self, _extracted_chars: usize, _threshold: usize) {
        self.fallbacks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_mrz_detected(&self, page_num: Option<usize>) {
        self.mrz_pages.lock().unwrap().push(page_num);
    }

    fn on_document_complete(&self, _used_ocr: bool, _chars: usize) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A file that exists on disk; the fake backend ignores its content.
fn pdf_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("input.pdf");
    std::fs::write(&path, b"%PDF-1.7\n").unwrap();
    path
}

fn config(
    backend: Arc<FakeBackend>,
    ocr: Arc<FakeOcr>,
    min_text_length: usize,
) -> docfuse::ExtractionConfigBuilder {
    ExtractionConfig::builder()
        .backend(backend)
        .ocr_engine(ocr)
        .min_text_length(min_text_length)
}

// ── Quality gate ─────────────────────────────────────────────────────────────

#[test]
fn sufficient_text_layer_never_calls_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["The quick brown fox jumps over"])]);
    let ocr = FakeOcr::new(&["SHOULD NOT APPEAR"]);
    let cfg = config(backend, ocr.clone(), 20).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert!(!result.used_ocr);
    assert_eq!(result.text, "The quick brown fox jumps over");
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn short_text_layer_is_replaced_by_ocr_text() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["Hi"]), text_page(&[])]);
    let ocr = FakeOcr::new(&["Scanned page one", "Scanned page two"]);
    let cfg = config(backend, ocr.clone(), 50).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert!(result.used_ocr);
    assert_eq!(result.text, "Scanned page one\nScanned page two");
    assert!(!result.text.contains("Hi"));
    assert_eq!(ocr.calls(), 2);
}

#[test]
fn text_exactly_at_threshold_is_sufficient() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["abcdefghij"])]);
    let ocr = FakeOcr::new(&["ocr"]);
    let cfg = config(backend, ocr.clone(), 10).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert!(!result.used_ocr);
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn zero_threshold_accepts_an_empty_text_layer() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&[])]);
    let ocr = FakeOcr::new(&["ocr"]);
    let cfg = config(backend, ocr.clone(), 0).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert_eq!(result, DocumentExtractionResult::empty());
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn ocr_required_without_engine_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["short"])]);
    let cfg = ExtractionConfig::builder()
        .backend(backend)
        .ocr_model_dir(models.path())
        .build()
        .unwrap();

    let err = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap_err();
    assert!(matches!(err, ExtractError::OcrUnavailable(_)));
}

// ── Arrangement ──────────────────────────────────────────────────────────────

fn two_column_page() -> FakePage {
    // Row-major content order: the right column's first row comes straight
    // after the left column's.
    FakePage {
        spans: vec![
            span(100.0, 0.0, "L1"),
            span(100.0, 611.0, "R1"),
            span(200.0, 0.0, "L2"),
        ],
        widgets: Vec::new(),
    }
}

#[test]
fn form_reads_left_column_before_right() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![two_column_page()]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_form(pdf_file(&dir), false, &cfg).unwrap();

    assert_eq!(result.text, "L1\nL2\nR1");
}

#[test]
fn form_keeps_same_row_columns_on_separate_lines() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage {
        spans: vec![
            span(100.0, 0.0, "Part 1."),
            span(100.0, 611.0, "Part 2."),
            span(120.0, 0.0, "Name"),
            span(120.0, 611.0, "Address"),
        ],
        widgets: Vec::new(),
    };
    let backend = FakeBackend::new(vec![page]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_form(pdf_file(&dir), false, &cfg).unwrap();

    assert_eq!(result.text, "Part 1.\nName\nPart 2.\nAddress");
}

#[test]
fn single_column_interleaves_by_vertical_position() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![two_column_page()]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert_eq!(result.text, "L1\nR1\nL2");
}

#[test]
fn widget_values_are_fused_with_text_layer() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage {
        spans: vec![span(100.0, 50.0, "Family Name:")],
        widgets: vec![
            FieldWidget {
                name: Some("family_name".into()),
                label: None,
                value: Some(FieldValue::Text("Eriksson".into())),
                anchor: Some((150.0, 50.0)),
            },
            FieldWidget {
                name: Some("middle_name".into()),
                label: None,
                value: Some(FieldValue::Text("  ".into())),
                anchor: Some((170.0, 50.0)),
            },
        ],
    };
    let backend = FakeBackend::new(vec![page]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_form(pdf_file(&dir), false, &cfg).unwrap();

    assert_eq!(result.text, "Family Name:\nfamily_name: Eriksson");
}

#[test]
fn widget_lines_survive_the_ocr_pass() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage {
        spans: Vec::new(),
        widgets: vec![FieldWidget {
            name: Some("a_number".into()),
            label: None,
            value: Some(FieldValue::Text("A123".into())),
            anchor: Some((700.0, 72.0)),
        }],
    };
    let backend = FakeBackend::new(vec![page]);
    let ocr = FakeOcr::new(&["Scanned header"]);
    let cfg = config(backend, ocr, 100).build().unwrap();

    let result = extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert!(result.used_ocr);
    assert_eq!(result.text, "Scanned header\na_number: A123");
}

// ── MRZ ──────────────────────────────────────────────────────────────────────

#[test]
fn passport_pdf_without_reader_has_no_mrz_sections() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["PASSPORT UTOPIA"])]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_passport(pdf_file(&dir), &cfg).unwrap();

    assert_eq!(result.text, "PASSPORT UTOPIA");
    assert!(!result.text.contains("[MRZ]"));
    assert!(!result.text.contains("[MRZ PARSED]"));
}

#[test]
fn mrz_scan_runs_backwards_and_stops_at_first_hit() {
    let dir = tempfile::tempdir().unwrap();
    let pages = vec![
        text_page(&["page one"]),
        text_page(&["page two"]),
        text_page(&["page three"]),
    ];
    let backend = FakeBackend::new(pages);
    let reader = FakeMrzReader::new(Some(1));
    let cfg = config(backend, FakeOcr::new(&[]), 0)
        .mrz_reader(reader.clone())
        .build()
        .unwrap();

    let result = extract_passport(pdf_file(&dir), &cfg).unwrap();

    assert_eq!(reader.seen(), vec![2, 1]);
    let expected_raw = format!("[MRZ]\n{MRZ_L1}\n{MRZ_L2}\n\n[MRZ PARSED]\nmrz_type: TD3\n");
    assert!(
        result
            .text
            .starts_with(&format!("page one\npage two\npage three\n\n{expected_raw}")),
        "unexpected text: {}",
        result.text
    );
    assert!(result.text.contains("surname: ERIKSSON"));
}

#[test]
fn failing_reader_still_returns_body() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["body"])]);
    let cfg = config(backend, FakeOcr::new(&[]), 0)
        .mrz_reader(Arc::new(FailingMrzReader))
        .build()
        .unwrap();

    let result = extract_passport(pdf_file(&dir), &cfg).unwrap();

    assert_eq!(result.text, "body");
}

#[test]
fn form_only_scans_for_mrz_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["form body"])]);
    let reader = FakeMrzReader::new(Some(0));
    let cfg = config(backend, FakeOcr::new(&[]), 0)
        .mrz_reader(reader.clone())
        .build()
        .unwrap();

    let without = extract_form(pdf_file(&dir), false, &cfg).unwrap();
    assert_eq!(without.text, "form body");
    assert!(reader.seen().is_empty());

    let with = extract_form(pdf_file(&dir), true, &cfg).unwrap();
    assert!(with.text.starts_with("form body\n\n[MRZ]\nP<UTO"));
}

#[test]
fn image_passport_is_ocr_only_with_mrz_from_image_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passport.png");
    RgbImage::new(3, 20).save(&path).unwrap();

    let mut texts = vec![""; 3];
    texts[2] = "PASSPORT\n  \nUTOPIA";
    let ocr = FakeOcr::new(&texts);
    let reader = FakeMrzReader::new(Some(2));
    let cfg = ExtractionConfig::builder()
        .ocr_engine(ocr.clone())
        .mrz_reader(reader.clone())
        .build()
        .unwrap();

    let result = extract_passport(&path, &cfg).unwrap();

    assert!(result.used_ocr);
    assert!(result
        .text
        .starts_with(&format!("PASSPORT\nUTOPIA\n\n[MRZ]\n{MRZ_L1}\n{MRZ_L2}")));
    assert_eq!(ocr.calls(), 1);
    assert_eq!(reader.seen(), vec![2]);
}

#[test]
fn image_passport_with_no_text_reports_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.png");
    RgbImage::new(1, 1).save(&path).unwrap();
    let cfg = ExtractionConfig::builder()
        .ocr_engine(FakeOcr::new(&[]))
        .build()
        .unwrap();

    let result = extract_passport(&path, &cfg).unwrap();

    assert_eq!(result.text, "");
    assert!(result.used_ocr);
}

/// Finds the specimen zone in any bytes it is handed.
struct SpecimenMrzReader {
    calls: AtomicUsize,
}

impl MrzReader for SpecimenMrzReader {
    fn read_mrz(&self, _image_bytes: &[u8]) -> Result<Option<Box<dyn MrzRecord>>, MrzError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let record = locate_mrz(&format!("{MRZ_L1}\n{MRZ_L2}"))
            .ok_or_else(|| MrzError::Detection("specimen did not parse".into()))?;
        Ok(Some(Box::new(record) as Box<dyn MrzRecord>))
    }
}

#[test]
fn undecodable_image_still_reaches_the_mrz_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, b"not a png").unwrap();
    let ocr = FakeOcr::new(&["never recognised"]);
    let reader = Arc::new(SpecimenMrzReader {
        calls: AtomicUsize::new(0),
    });
    let cfg = ExtractionConfig::builder()
        .ocr_engine(ocr.clone())
        .mrz_reader(reader.clone())
        .build()
        .unwrap();

    let result = extract_passport(&path, &cfg).unwrap();

    assert!(result.used_ocr);
    assert!(result
        .text
        .starts_with(&format!("[MRZ]\n{MRZ_L1}\n{MRZ_L2}\n\n[MRZ PARSED]\n")));
    assert_eq!(ocr.calls(), 0);
    assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
}

// ── Entry-point behaviour ────────────────────────────────────────────────────

#[test]
fn missing_input_is_an_empty_non_ocr_result() {
    let backend = FakeBackend::new(vec![text_page(&["never read"])]);
    let cfg = config(backend.clone(), FakeOcr::new(&[]), 0).build().unwrap();

    let result = extract_passport("/no/such/passport.pdf", &cfg).unwrap();

    assert_eq!(result, DocumentExtractionResult::empty());
    assert!(backend.passwords.lock().unwrap().is_empty());
}

#[test]
fn extraction_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["tiny"]), two_column_page()]);
    let ocr = FakeOcr::new(&["first scan", "second scan"]);
    let cfg = config(backend, ocr, 500)
        .mrz_reader(FakeMrzReader::new(Some(0)))
        .build()
        .unwrap();
    let path = pdf_file(&dir);

    let a = extract_passport(&path, &cfg).unwrap();
    let b = extract_passport(&path, &cfg).unwrap();

    assert_eq!(a, b);
    assert!(a.used_ocr);
}

#[test]
fn password_is_passed_to_the_backend() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["secret body"])]);
    let cfg = config(backend.clone(), FakeOcr::new(&[]), 0)
        .password("s3cret")
        .build()
        .unwrap();

    extract_pdf(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg).unwrap();

    assert_eq!(
        *backend.passwords.lock().unwrap(),
        vec![Some("s3cret".to_string())]
    );
}

#[test]
fn progress_reports_both_passes_and_mrz_page() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&[]), text_page(&[])]);
    let progress = Arc::new(RecordingProgress::default());
    let cfg = config(backend, FakeOcr::new(&["a", "b"]), 10)
        .mrz_reader(FakeMrzReader::new(Some(1)))
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    extract_passport(pdf_file(&dir), &cfg).unwrap();

    assert_eq!(
        *progress.pages.lock().unwrap(),
        vec![
            (1, PassKind::TextLayer),
            (2, PassKind::TextLayer),
            (1, PassKind::Ocr),
            (2, PassKind::Ocr),
        ]
    );
    assert_eq!(progress.fallbacks.load(Ordering::SeqCst), 1);
    assert_eq!(*progress.mrz_pages.lock().unwrap(), vec![Some(2)]);
    assert_eq!(progress.completed.load(Ordering::SeqCst), 1);
}

// ── Async wrappers ───────────────────────────────────────────────────────────

/// Opens documents that keep a borrow of the password for their lifetime.
struct UnlockingBackend;

struct UnlockedDocument<'a> {
    password: Option<&'a str>,
}

impl DocumentBackend for UnlockingBackend {
    fn open<'a>(
        &'a self,
        _path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PagedDocument + 'a>, ExtractError> {
        Ok(Box::new(UnlockedDocument { password }))
    }
}

impl PagedDocument for UnlockedDocument<'_> {
    fn page_count(&self) -> usize {
        1
    }

    fn geometry(&self, _page: usize) -> Result<PageGeometry, ExtractError> {
        Ok(PageGeometry::new(612.0, 792.0))
    }

    fn text_spans(&self, _page: usize) -> Result<Vec<TextSpan>, ExtractError> {
        let text = format!("unlocked with {}", self.password.unwrap_or("nothing"));
        Ok(vec![span(100.0, 72.0, &text)])
    }

    fn widgets(&self, _page: usize) -> Result<Vec<FieldWidget>, ExtractError> {
        Ok(Vec::new())
    }

    fn rasterize(&self, _page: usize, _dpi: u32) -> Result<DynamicImage, ExtractError> {
        Ok(DynamicImage::new_rgb8(1, 4))
    }
}

#[tokio::test]
async fn document_may_borrow_password_on_blocking_pool() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ExtractionConfig::builder()
        .backend(Arc::new(UnlockingBackend))
        .ocr_engine(FakeOcr::new(&[]))
        .min_text_length(0)
        .password("s3cret")
        .build()
        .unwrap();

    let result = extract_pdf_async(pdf_file(&dir), LayoutMode::SingleColumn, false, &cfg)
        .await
        .unwrap();

    assert_eq!(result.text, "unlocked with s3cret");
}

#[tokio::test]
async fn async_passport_matches_sync() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![text_page(&["async body"])]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();
    let path = pdf_file(&dir);

    let async_result = extract_passport_async(&path, &cfg).await.unwrap();
    let sync_result = extract_passport(&path, &cfg).unwrap();

    assert_eq!(async_result, sync_result);
}

#[test]
fn async_form_can_be_driven_by_block_on() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new(vec![two_column_page()]);
    let cfg = config(backend, FakeOcr::new(&[]), 0).build().unwrap();
    let path = pdf_file(&dir);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let result = rt
        .block_on(extract_form_async(path, false, &cfg))
        .unwrap();

    assert_eq!(result.text, "L1\nL2\nR1");
}

#[test]
fn async_missing_input_on_current_thread_runtime() {
    let cfg = ExtractionConfig::default();
    let result = tokio_test::block_on(extract_passport_async("/no/such/file.png", &cfg)).unwrap();
    assert_eq!(result, DocumentExtractionResult::empty());
}
