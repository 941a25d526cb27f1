//! # Editor Navigation
//!
//! The controller never touches the editor directly. When a rejected
//! submission points at a source line it emits a `NavigationRequest`, and
//! whoever owns the editor applies it through the `EditorAdapter` trait.

/// Capabilities the controller needs from an editor. Lines and columns are 1-based.
pub trait EditorAdapter {
    /// Give the editor input focus.
    fn focus(&mut self);
    /// Scroll so that `line` is visible.
    fn reveal_line(&mut self, line: usize);
    /// Move the caret. Out-of-range positions are clamped by the editor.
    fn set_caret(&mut self, line: usize, column: usize);
}

/// One-shot instruction to move the editor to a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub line: usize,
}

impl NavigationRequest {
    pub fn new(line: usize) -> Self {
        Self { line }
    }

    /// Focus the editor, reveal the line, then put the caret at column 1.
    /// Consumes the request.
    pub fn apply<E: EditorAdapter + ?Sized>(self, editor: &mut E) {
        editor.focus();
        editor.reveal_line(self.line);
        editor.set_caret(self.line, 1);
    }
}
