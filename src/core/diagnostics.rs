//! # Error Position Recovery
//!
//! The execution service reports syntax errors as free text, e.g.
//! `Syntax error: invalid syntax (<unknown>, line 7)`. There is no
//! structured field for the position, so the line is sniffed out of the
//! message here. Everything that depends on that text format lives in this
//! module so it can be swapped if the service grows a real error contract.

use std::sync::LazyLock;

use regex::Regex;

/// Marker the service puts in front of parse failures.
pub const SYNTAX_ERROR_MARKER: &str = "Syntax error";

static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"line ([0-9]+)").expect("line pattern is valid"));

/// Returns the 1-based source line of a syntax error reported in `output`.
///
/// `None` when the text is not a syntax error, carries no `line <n>`, or the
/// number is zero or does not fit in `usize`. Only the first match counts.
pub fn syntax_error_line(output: &str) -> Option<usize> {
    if !output.contains(SYNTAX_ERROR_MARKER) {
        return None;
    }
    let caps = LINE_PATTERN.captures(output)?;
    let line: usize = caps[1].parse().ok()?;
    (line > 0).then_some(line)
}
