//! OCR-backed MRZ reader.
//!
//! Runs the configured [`OcrEngine`] over the image, looks for the
//! fixed-width `[A-Z0-9<]` lines of an ICAO 9303 machine-readable zone and
//! splits them into named fields. Three layouts are recognised:
//!
//! | Format | Lines × width | Used on |
//! |--------|---------------|---------|
//! | TD3 | 2 × 44 | passports |
//! | TD2 | 2 × 36 | older ID cards, visas |
//! | TD1 | 3 × 30 | ID cards |
//!
//! OCR rarely reproduces a line at exactly the right width, so lines within
//! two characters of the nominal width are accepted and padded or truncated.
//! Check digits are reported as read; they are not validated.

use crate::capability::{MrzReader, MrzRecord, OcrEngine};
use crate::error::MrzError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

static RE_MRZ_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9<]{26,48}$").unwrap());

const WIDTH_TOLERANCE: usize = 2;

/// Document layout of a detected zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrzFormat {
    Td1,
    Td2,
    Td3,
}

impl MrzFormat {
    fn line_count(self) -> usize {
        match self {
            MrzFormat::Td1 => 3,
            MrzFormat::Td2 | MrzFormat::Td3 => 2,
        }
    }

    fn width(self) -> usize {
        match self {
            MrzFormat::Td1 => 30,
            MrzFormat::Td2 => 36,
            MrzFormat::Td3 => 44,
        }
    }
}

impl fmt::Display for MrzFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MrzFormat::Td1 => f.write_str("TD1"),
            MrzFormat::Td2 => f.write_str("TD2"),
            MrzFormat::Td3 => f.write_str("TD3"),
        }
    }
}

/// A located and field-split machine-readable zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMrz {
    pub format: MrzFormat,
    /// Zone lines, normalised to the format's exact width.
    pub lines: Vec<String>,
    /// Named fields in document order.
    pub fields: Vec<(String, String)>,
}

impl fmt::Display for ParsedMrz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl MrzRecord for ParsedMrz {
    fn raw_text(&self) -> Option<String> {
        Some(self.lines.join("\n"))
    }

    fn fields(&self) -> Option<Vec<(String, String)>> {
        Some(self.fields.clone())
    }
}

/// [`MrzReader`] that finds the zone in OCR output.
pub struct OcrMrzReader {
    engine: Arc<dyn OcrEngine>,
}

impl OcrMrzReader {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl MrzReader for OcrMrzReader {
    fn read_mrz(&self, image_bytes: &[u8]) -> Result<Option<Box<dyn MrzRecord>>, MrzError> {
        let image =
            image::load_from_memory(image_bytes).map_err(|e| MrzError::Decode(e.to_string()))?;
        let text = self.engine.recognize(&image.to_rgb8())?;
        Ok(locate_mrz(&text).map(|mrz| Box::new(mrz) as Box<dyn MrzRecord>))
    }
}

/// Find the bottom-most MRZ in a block of OCR text.
pub fn locate_mrz(text: &str) -> Option<ParsedMrz> {
    let candidates: Vec<Option<String>> = text.lines().map(normalize_line).collect();

    for end in (0..candidates.len()).rev() {
        for format in [MrzFormat::Td1, MrzFormat::Td3, MrzFormat::Td2] {
            let n = format.line_count();
            if end + 1 < n {
                continue;
            }
            let window = &candidates[end + 1 - n..=end];
            let fits = window.iter().all(|line| {
                line.as_ref()
                    .is_some_and(|l| l.len().abs_diff(format.width()) <= WIDTH_TOLERANCE)
            });
            if fits {
                let lines: Vec<String> = window
                    .iter()
                    .flatten()
                    .map(|l| fit_width(l, format.width()))
                    .collect();
                debug!("Located {} MRZ ending at OCR line {}", format, end + 1);
                return Some(parse_lines(format, lines));
            }
        }
    }
    None
}

/// Normalise one OCR line; `None` if it cannot be an MRZ line.
fn normalize_line(line: &str) -> Option<String> {
    let cleaned: String = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| match c {
            '«' => vec!['<', '<'],
            '‹' => vec!['<'],
            other => other.to_uppercase().collect(),
        })
        .collect();
    RE_MRZ_LINE.is_match(&cleaned).then_some(cleaned)
}

fn fit_width(line: &str, width: usize) -> String {
    let mut s: String = line.chars().take(width).collect();
    while s.len() < width {
        s.push('<');
    }
    s
}

fn parse_lines(format: MrzFormat, lines: Vec<String>) -> ParsedMrz {
    let mut fields = vec![("mrz_type".to_string(), format.to_string())];
    let mut push = |key: &str, value: String| fields.push((key.to_string(), value));

    match format {
        MrzFormat::Td3 | MrzFormat::Td2 => {
            let (l1, l2) = (&lines[0], &lines[1]);
            let w = format.width();
            let (surname, names) = split_names(&l1[5..w]);
            push("type", code(l1, 0..2));
            push("country", code(l1, 2..5));
            push("number", code(l2, 0..9));
            push("date_of_birth", code(l2, 13..19));
            push("expiration_date", code(l2, 21..27));
            push("nationality", code(l2, 10..13));
            push("sex", code(l2, 20..21));
            push("names", names);
            push("surname", surname);
            if format == MrzFormat::Td3 {
                push("personal_number", code(l2, 28..42));
            } else {
                push("optional", code(l2, 28..35));
            }
            push("check_number", code(l2, 9..10));
            push("check_date_of_birth", code(l2, 19..20));
            push("check_expiration_date", code(l2, 27..28));
            if format == MrzFormat::Td3 {
                push("check_personal_number", code(l2, 42..43));
            }
            push("check_composite", code(l2, w - 1..w));
        }
        MrzFormat::Td1 => {
            let (l1, l2, l3) = (&lines[0], &lines[1], &lines[2]);
            let (surname, names) = split_names(l3);
            push("type", code(l1, 0..2));
            push("country", code(l1, 2..5));
            push("number", code(l1, 5..14));
            push("date_of_birth", code(l2, 0..6));
            push("expiration_date", code(l2, 8..14));
            push("nationality", code(l2, 15..18));
            push("sex", code(l2, 7..8));
            push("names", names);
            push("surname", surname);
            push("optional1", code(l1, 15..30));
            push("optional2", code(l2, 18..29));
            push("check_number", code(l1, 14..15));
            push("check_date_of_birth", code(l2, 6..7));
            push("check_expiration_date", code(l2, 14..15));
            push("check_composite", code(l2, 29..30));
        }
    }

    ParsedMrz {
        format,
        lines,
        fields,
    }
}

/// A fixed-position code with its `<` filler removed.
fn code(line: &str, range: Range<usize>) -> String {
    line[range].trim_matches('<').to_string()
}

/// Split `SURNAME<<GIVEN<NAMES` into `(surname, given names)`.
fn split_names(field: &str) -> (String, String) {
    let (surname, names) = field.split_once("<<").unwrap_or((field, ""));
    (words(surname), words(names))
}

fn words(s: &str) -> String {
    s.split('<')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
