//! Line arrangement: order positioned lines from any mix of sources into a
//! single reading sequence.
//!
//! Text-layer, OCR and widget lines are sorted together rather than emitted
//! as separate sections, so a filled answer lands next to the label it
//! belongs to.
//!
//! Two-column mode assumes the whole document is two-column: lines are split
//! at the page's horizontal midpoint and the left half is read completely
//! before the right half. There is no per-region column detection.

use crate::capability::PageGeometry;
use crate::config::LayoutMode;
use crate::output::PositionedLine;
use std::cmp::Ordering;

/// Order `lines` for reading according to `mode`.
///
/// Sorting is stable, so lines with identical positions keep their input
/// order (text-layer lines before widget lines, as the page pass combines
/// them).
pub fn arrange_lines(
    lines: Vec<PositionedLine>,
    geometry: &PageGeometry,
    mode: LayoutMode,
) -> Vec<PositionedLine> {
    match mode {
        LayoutMode::SingleColumn => sorted(lines),
        LayoutMode::TwoColumn => {
            let mid = geometry.mid_x();
            let (left, right): (Vec<_>, Vec<_>) = lines.into_iter().partition(|l| l.x <= mid);
            let mut ordered = sorted(left);
            ordered.extend(sorted(right));
            ordered
        }
    }
}

/// Join the non-empty texts of arranged lines with `\n`.
pub fn join_lines(lines: &[PositionedLine]) -> String {
    lines
        .iter()
        .filter(|l| !l.text.is_empty())
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn sorted(mut lines: Vec<PositionedLine>) -> Vec<PositionedLine> {
    lines.sort_by(reading_order);
    lines
}

fn reading_order(a: &PositionedLine, b: &PositionedLine) -> Ordering {
    a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
}
