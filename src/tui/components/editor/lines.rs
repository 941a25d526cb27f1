//! Pure line/column arithmetic shared by the CodeEditor and the OutputPane.
//!
//! The buffer is a single `String`; the caret is a byte offset into it.
//! Lines and columns here are 0-based and columns count chars, not bytes.

use unicode_width::UnicodeWidthChar;

/// Display columns a tab occupies (matches highlight expansion).
pub(in crate::tui) const TAB_WIDTH: usize = 4;

/// Byte offset of the start of every line. Always has at least one entry.
pub(in crate::tui) fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

pub(in crate::tui) fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// The text of line `line` without its newline, or "" past the end.
pub(in crate::tui) fn line_text(text: &str, line: usize) -> &str {
    text.split('\n').nth(line).unwrap_or("")
}

/// (line, column) of byte offset `pos`.
pub(in crate::tui) fn position_of(text: &str, pos: usize) -> (usize, usize) {
    let before = &text[..pos];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before[line_start..].chars().count())
}

/// Byte offset of (line, column), clamping both to the text.
pub(in crate::tui) fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let starts = line_starts(text);
    let line = line.min(starts.len() - 1);
    let start = starts[line];
    let content = line_text(text, line);
    let within = content
        .char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    start + within
}

/// Terminal cells needed to draw `s`, with tabs expanded.
pub(in crate::tui) fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Char column on `line_content` whose cell covers display column `target`.
pub(in crate::tui) fn column_at_display(line_content: &str, target: usize) -> usize {
    let mut used = 0;
    for (col, c) in line_content.chars().enumerate() {
        let w = char_width(c);
        if used + w > target {
            return col;
        }
        used += w;
    }
    line_content.chars().count()
}

fn char_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(0)
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(in crate::tui) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(in crate::tui) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
