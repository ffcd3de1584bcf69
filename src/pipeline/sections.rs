//! Bracketed appendix sections (`[MRZ]`, `[MRZ PARSED]`).
//!
//! The only structural markup in the output: each section is a header line
//! in square brackets followed by its body, separated from what precedes it
//! by one blank line. Empty sections are never emitted.

use crate::output::MrzResult;

pub const MRZ_TITLE: &str = "MRZ";
pub const MRZ_PARSED_TITLE: &str = "MRZ PARSED";

/// Append `[title]\nbody` to `text`.
///
/// Returns `text` unchanged when `body` is empty, and the bare section when
/// `text` is blank.
pub fn append_section(text: String, title: &str, body: &str) -> String {
    if body.is_empty() {
        return text;
    }
    if text.trim().is_empty() {
        return format!("[{title}]\n{body}");
    }
    format!("{text}\n\n[{title}]\n{body}")
}

/// Append both MRZ sections in their fixed order.
pub fn append_mrz(text: String, mrz: &MrzResult) -> String {
    let text = append_section(text, MRZ_TITLE, &mrz.raw_text);
    append_section(text, MRZ_PARSED_TITLE, &mrz.parsed_text)
}
