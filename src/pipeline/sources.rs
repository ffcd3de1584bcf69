//! Positioned-line sources: the three independent producers of
//! `(y, x, text)` lines for a page.
//!
//! | Source | Positions |
//! |--------|-----------|
//! | [`text_layer_lines`] | true line bounding boxes from the embedded text |
//! | [`ocr_lines`] | synthesised, evenly spaced down the page |
//! | [`field_widget_lines`] | true widget bounding boxes |
//!
//! None of these fail on an empty page; only a page the backend cannot
//! provide at all is an error, and that error is fatal for the document.

use crate::capability::{FieldValue, FieldWidget, OcrEngine, PagedDocument, TextSpan};
use crate::error::ExtractError;
use crate::output::PositionedLine;
use tracing::debug;

// ── Text layer ───────────────────────────────────────────────────────────

/// Read the page's embedded text as one positioned line per visual line.
pub fn text_layer_lines(
    doc: &dyn PagedDocument,
    page: usize,
) -> Result<Vec<PositionedLine>, ExtractError> {
    let spans = doc.text_spans(page)?;
    let lines = lines_from_spans(spans);
    debug!("Page {}: {} text-layer lines", page + 1, lines.len());
    Ok(lines)
}

/// Widest horizontal gap, in span heights, that still joins two spans on
/// the same row into one line.
const MAX_GAP_HEIGHTS: f64 = 2.0;

/// Group spans into visual lines and concatenate each line's span text.
///
/// Spans arrive in content order. A span joins the current line when its
/// vertical extent overlaps the line's band by at least half of the smaller
/// height and its horizontal gap to the line is at most twice that height;
/// otherwise it starts a new line. Within a line spans are joined
/// left to right, lines are trimmed and empty ones dropped. Each line is
/// anchored at its topmost and leftmost span edge.
pub fn lines_from_spans(spans: Vec<TextSpan>) -> Vec<PositionedLine> {
    let mut groups: Vec<Vec<TextSpan>> = Vec::new();

    for span in spans {
        match groups.last_mut() {
            Some(group) if same_line(group, &span) => group.push(span),
            _ => groups.push(vec![span]),
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            group.sort_by(|a, b| a.left.total_cmp(&b.left));
            let text = join_spans(&group);
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let top = group.iter().map(|s| s.top).fold(f64::INFINITY, f64::min);
            let left = group.iter().map(|s| s.left).fold(f64::INFINITY, f64::min);
            Some(PositionedLine::new(top, left, text))
        })
        .collect()
}

fn same_line(group: &[TextSpan], span: &TextSpan) -> bool {
    let top = group.iter().map(|s| s.top).fold(f64::INFINITY, f64::min);
    let bottom = group.iter().map(|s| s.bottom).fold(f64::NEG_INFINITY, f64::max);
    let overlap = bottom.min(span.bottom) - top.max(span.top);
    let smaller = (bottom - top).min(span.bottom - span.top);

    let left = group.iter().map(|s| s.left).fold(f64::INFINITY, f64::min);
    let right = group.iter().map(|s| s.right).fold(f64::NEG_INFINITY, f64::max);
    let gap = (span.left - right).max(left - span.right);

    if smaller <= 0.0 {
        // Degenerate (zero-height) boxes only share a line at the same top
        // and when they touch horizontally.
        return (span.top - top).abs() < f64::EPSILON && gap <= 0.0;
    }
    // A row shared across a wide horizontal gap belongs to another column.
    overlap >= smaller / 2.0 && gap <= smaller * MAX_GAP_HEIGHTS
}

/// Concatenate spans, inserting a space across visible horizontal gaps the
/// span texts don't already account for.
fn join_spans(group: &[TextSpan]) -> String {
    let mut out = String::new();
    let mut prev: Option<&TextSpan> = None;
    for span in group {
        if let Some(p) = prev {
            let height = (p.bottom - p.top).max(span.bottom - span.top);
            let gap = span.left - p.right;
            let spaced = out.ends_with(char::is_whitespace)
                || span.text.starts_with(char::is_whitespace);
            if !spaced && height > 0.0 && gap > height * 0.25 {
                out.push(' ');
            }
        }
        out.push_str(&span.text);
        prev = Some(span);
    }
    out
}

// ── OCR ──────────────────────────────────────────────────────────────────

/// Rasterise the page at `dpi`, recognise it, and synthesise positions.
///
/// OCR failures propagate: when OCR is the chosen strategy there is no
/// further fallback.
pub fn ocr_lines(
    doc: &dyn PagedDocument,
    page: usize,
    engine: &dyn OcrEngine,
    dpi: u32,
) -> Result<Vec<PositionedLine>, ExtractError> {
    let geometry = doc.geometry(page)?;
    let image = doc.rasterize(page, dpi)?;
    let rgb = image.to_rgb8();
    debug!(
        "Page {}: OCR on {}x{} px @ {} DPI",
        page + 1,
        rgb.width(),
        rgb.height(),
        dpi
    );
    let text = engine.recognize(&rgb)?;
    Ok(synthesize_positions(&text, geometry.left, geometry.height))
}

/// Spread OCR text lines evenly down a page of `page_height`.
///
/// OCR output has no per-line geometry, but its order already approximates
/// top-to-bottom reading order, so a consistent ascending key is enough:
/// `y = step * (i + 1)` with `step = page_height / (n + 1)`, `x = left`.
pub fn synthesize_positions(text: &str, left: f64, page_height: f64) -> Vec<PositionedLine> {
    let raw: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if raw.is_empty() {
        return Vec::new();
    }

    let height = if page_height > 0.0 { page_height } else { 1.0 };
    let step = height / (raw.len() as f64 + 1.0);
    raw.into_iter()
        .enumerate()
        .map(|(i, line)| PositionedLine::new(step * (i as f64 + 1.0), left, line))
        .collect()
}

// ── Form-field widgets ───────────────────────────────────────────────────

/// Widget counts for one page, reported for form completeness only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCounts {
    pub total: usize,
    pub filled: usize,
}

/// Emit one line per widget currently holding a non-empty value.
pub fn field_widget_lines(
    doc: &dyn PagedDocument,
    page: usize,
) -> Result<(Vec<PositionedLine>, FieldCounts), ExtractError> {
    let widgets = doc.widgets(page)?;
    let mut counts = FieldCounts {
        total: widgets.len(),
        filled: 0,
    };
    let lines: Vec<PositionedLine> = widgets.iter().filter_map(widget_line).collect();
    counts.filled = lines.len();
    Ok((lines, counts))
}

/// Synthesise `"<display>: <value>"` for a filled widget.
///
/// The display name is the field name, else the label, else `field`; when
/// both name and label are present and differ it reads `"name (label)"`.
/// Widgets without a rectangle are anchored at the page origin.
pub fn widget_line(widget: &FieldWidget) -> Option<PositionedLine> {
    let value = widget
        .value
        .as_ref()
        .map(normalize_field_value)
        .unwrap_or_default();
    if value.is_empty() {
        return None;
    }

    let name = widget.name.as_deref().unwrap_or("").trim();
    let label = widget.label.as_deref().unwrap_or("").trim();
    let display = match (name.is_empty(), label.is_empty()) {
        (false, false) if name != label => format!("{name} ({label})"),
        (false, _) => name.to_string(),
        (true, false) => label.to_string(),
        (true, true) => "field".to_string(),
    };

    let (y, x) = widget.anchor.unwrap_or((0.0, 0.0));
    Some(PositionedLine::new(y, x, format!("{display}: {value}")))
}

/// Render a stored widget value as display text.
///
/// Bytes are decoded permissively (invalid sequences dropped), lists are
/// joined with `", "` after dropping empty items, and text loses one leading
/// `/` left over from PDF name-object encoding.
pub fn normalize_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Bytes(bytes) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|&c| c != char::REPLACEMENT_CHARACTER)
            .collect::<String>()
            .trim()
            .to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(normalize_field_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Text(text) => {
            let text = text.trim();
            text.strip_prefix('/').unwrap_or(text).to_string()
        }
    }
}
