//! Value types produced by the extraction engine.
//!
//! Every value here is created fresh by one extraction call and never
//! mutated or cached afterwards.

use serde::{Deserialize, Serialize};

/// One line of content anchored at its top-left corner on a page.
///
/// Coordinates are in page units (PDF points for documents, pixels for
/// standalone images) with the origin at the top-left and `y` growing
/// downwards. Lines from different sources covering the same visual area are
/// all kept: a rendered label and the widget value behind it carry
/// different information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLine {
    /// Vertical position of the line's top edge.
    pub y: f64,
    /// Horizontal position of the line's left edge.
    pub x: f64,
    pub text: String,
}

impl PositionedLine {
    pub fn new(y: f64, x: f64, text: impl Into<String>) -> Self {
        Self {
            y,
            x,
            text: text.into(),
        }
    }
}

/// Yield of one page in one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageExtractionResult {
    /// Arranged page text, one line per `\n`.
    pub text: String,
    /// Number of fillable-field widgets on the page.
    pub total_fields: usize,
    /// Number of those widgets holding a non-empty value.
    pub filled_fields: usize,
}

/// Final yield for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtractionResult {
    /// Body text followed by the optional `[MRZ]` / `[MRZ PARSED]` sections.
    pub text: String,
    /// `true` when the body text came from optical recognition.
    pub used_ocr: bool,
}

impl DocumentExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Machine-readable-zone data for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrzResult {
    /// The reader's textual rendering of the zone.
    pub raw_text: String,
    /// `"key: value"` per line, in the reader's field order.
    pub parsed_text: String,
}

impl MrzResult {
    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty() && self.parsed_text.is_empty()
    }
}
