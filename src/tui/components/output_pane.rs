//! # OutputPane Component
//!
//! Scrollable text area holding the latest submission output. The text is
//! editable when the pane has focus; every change is reported as
//! `OutputEvent::Changed` (the core's `EditOutput` action).
//!
//! ## Architecture
//!
//! Same split as other stateful views: `OutputPane` is rebuilt each frame
//! with the verdict as a prop and wraps `&mut OutputPaneState`, which lives
//! in `TuiState` and survives between frames. The state keeps its own copy
//! of the text; the event loop reloads it with `load()` whenever the core
//! replaces or clears the result.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::editor::lines::{
    column_at_display, display_width, line_count, line_starts, line_text, next_char_boundary,
    offset_of, position_of, prev_char_boundary,
};
use crate::tui::event::TuiEvent;

pub const PLACEHOLDER: &str = "Output will be displayed here...";
const INDENT: &str = "    ";

/// High-level events emitted by the output pane
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// The text changed; carries the full new content.
    Changed(String),
}

/// Text, caret and scroll state for the output pane.
/// Must be persisted in the parent TuiState.
#[derive(Default)]
pub struct OutputPaneState {
    pub scroll_state: ScrollViewState,
    pub focused: bool,
    buffer: String,
    /// Caret as byte offset in buffer
    cursor: usize,
    /// Content size from the last render
    content: Size,
    /// Text area from the last render (for clamping and click hit-testing)
    text_area: Rect,
}

impl OutputPaneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text with a fresh result; caret and view go back to the top.
    pub fn load(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = 0;
        self.scroll_state.scroll_to_top();
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Caret as 1-based (line, column).
    pub fn caret(&self) -> (usize, usize) {
        let (line, col) = position_of(&self.buffer, self.cursor);
        (line + 1, col + 1)
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Place the caret at a screen cell, if it lies in the text area.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        if !self.text_area.contains(Position::new(column, row)) {
            return false;
        }
        let offset = self.scroll_state.offset();
        let line = (offset.y + row - self.text_area.y) as usize;
        let line = line.min(line_count(&self.buffer) - 1);
        let display_col = (offset.x + column - self.text_area.x) as usize;
        let col = column_at_display(line_text(&self.buffer, line), display_col);
        self.cursor = offset_of(&self.buffer, line, col);
        true
    }

    fn clamp_scroll(&mut self) {
        let max_x = self.content.width.saturating_sub(self.text_area.width);
        let max_y = self.content.height.saturating_sub(self.text_area.height);
        let current = self.scroll_state.offset();
        if current.x > max_x || current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x.min(max_x),
                y: current.y.min(max_y),
            });
        }
    }

    /// Caret as (display column, line), both 0-based.
    fn caret_cell(&self) -> (usize, usize) {
        let (line, _) = position_of(&self.buffer, self.cursor);
        let line_start = line_starts(&self.buffer)[line];
        (display_width(&self.buffer[line_start..self.cursor]), line)
    }

    fn ensure_caret_visible(&mut self) {
        if self.text_area.is_empty() {
            return;
        }
        let (col, line) = self.caret_cell();
        let offset = self.scroll_state.offset();
        let width = self.text_area.width as usize;
        let height = self.text_area.height as usize;
        let top = (offset.y as usize).clamp(line.saturating_sub(height - 1), line);
        let left = (offset.x as usize).clamp(col.saturating_sub(width - 1), col);
        self.scroll_state.set_offset(Position {
            x: left.min(u16::MAX as usize) as u16,
            y: top.min(u16::MAX as usize) as u16,
        });
    }

    fn move_to(&mut self, pos: usize) {
        self.cursor = pos;
        self.ensure_caret_visible();
    }

    fn move_lines(&mut self, delta: isize) {
        let (line, col) = position_of(&self.buffer, self.cursor);
        let last = line_count(&self.buffer) - 1;
        let target = line.saturating_add_signed(delta).min(last);
        self.move_to(offset_of(&self.buffer, target, col));
    }

    fn changed(&mut self) -> Option<OutputEvent> {
        self.ensure_caret_visible();
        Some(OutputEvent::Changed(self.buffer.clone()))
    }

    fn insert(&mut self, text: &str) -> Option<OutputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.changed()
    }
}

impl EventHandler for OutputPaneState {
    type Event = OutputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            TuiEvent::Newline => self.insert("\n"),
            TuiEvent::Tab => self.insert(INDENT),
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&text)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.move_to(prev_char_boundary(&self.buffer, self.cursor));
                }
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.move_to(next_char_boundary(&self.buffer, self.cursor));
                }
                None
            }
            TuiEvent::CursorUp => {
                self.move_lines(-1);
                None
            }
            TuiEvent::CursorDown => {
                self.move_lines(1);
                None
            }
            TuiEvent::CursorHome => {
                let (line, _) = position_of(&self.buffer, self.cursor);
                self.move_to(offset_of(&self.buffer, line, 0));
                None
            }
            TuiEvent::CursorEnd => {
                let (line, _) = position_of(&self.buffer, self.cursor);
                self.move_to(offset_of(&self.buffer, line, usize::MAX));
                None
            }
            // Wheel and paging scroll the view without moving the caret
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::PageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::PageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
                None
            }
            _ => None,
        }
    }
}

pub struct OutputPane<'a> {
    pub state: &'a mut OutputPaneState,
    /// `Some(true)` succeeded, `Some(false)` failed, `None` before the first result
    pub verdict: Option<bool>,
}

impl<'a> OutputPane<'a> {
    pub fn new(state: &'a mut OutputPaneState, verdict: Option<bool>) -> Self {
        Self { state, verdict }
    }
}

impl Component for OutputPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let accent = match self.verdict {
            Some(true) => Color::Green,
            Some(false) => Color::Red,
            None => Color::DarkGray,
        };
        let border_style = if self.state.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(accent)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Output");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // One column is kept for the vertical scrollbar
        let text_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };
        // Lines are not wrapped; long ones scroll horizontally like the editor.
        // One extra column leaves room for the caret after the last char.
        let widest = self.state.buffer.split('\n').map(display_width).max().unwrap_or(0) + 1;
        let content = Size::new(
            (widest.min(u16::MAX as usize) as u16).max(text_area.width),
            line_count(&self.state.buffer).min(u16::MAX as usize) as u16,
        );
        self.state.content = content;
        self.state.text_area = text_area;
        self.state.clamp_scroll();

        let text = self.state.buffer.as_str();
        let paragraph = if text.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(text)
        };

        let mut scroll_view = ScrollView::new(content)
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Automatic);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content.width, content.height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);

        if self.state.focused {
            let (col, line) = self.state.caret_cell();
            let offset = self.state.scroll_state.offset();
            let (left, top) = (offset.x as usize, offset.y as usize);
            if line >= top
                && line < top + text_area.height as usize
                && col >= left
                && col < left + text_area.width as usize
            {
                frame.set_cursor_position((
                    text_area.x + (col - left) as u16,
                    text_area.y + (line - top) as u16,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn draw(terminal: &mut Terminal<TestBackend>, state: &mut OutputPaneState, verdict: Option<bool>) {
        terminal
            .draw(|f| OutputPane::new(state, verdict).render(f, f.area()))
            .unwrap();
    }

    #[test]
    fn test_placeholder_before_first_result() {
        let mut terminal = Terminal::new(TestBackend::new(50, 5)).unwrap();
        let mut state = OutputPaneState::new();

        draw(&mut terminal, &mut state, None);

        assert!(screen_text(&terminal).contains(PLACEHOLDER));
    }

    #[test]
    fn test_placeholder_after_clear() {
        let mut terminal = Terminal::new(TestBackend::new(50, 5)).unwrap();
        let mut state = OutputPaneState::new();
        state.load("42");
        state.load("");

        draw(&mut terminal, &mut state, Some(false));

        assert!(screen_text(&terminal).contains(PLACEHOLDER));
    }

    #[test]
    fn test_renders_output_text() {
        let mut terminal = Terminal::new(TestBackend::new(50, 5)).unwrap();
        let mut state = OutputPaneState::new();
        state.load("Fibonacci sequence:\n0\n1");

        draw(&mut terminal, &mut state, Some(true));

        let text = screen_text(&terminal);
        assert!(text.contains("Output"));
        assert!(text.contains("Fibonacci sequence:"));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut terminal = Terminal::new(TestBackend::new(30, 7)).unwrap();
        let mut state = OutputPaneState::new();
        let long: Vec<String> = (0..20).map(|i| format!("row {i}")).collect();
        state.load(&long.join("\n"));

        draw(&mut terminal, &mut state, Some(true));

        for _ in 0..100 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        // 20 rows of content, 5 visible
        assert_eq!(state.offset(), 15);

        state.load("again");
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_typing_edits_text() {
        let mut state = OutputPaneState::new();
        state.load("42");
        state.handle_event(&TuiEvent::CursorEnd);

        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('!')),
            Some(OutputEvent::Changed("42!".to_string()))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::Newline),
            Some(OutputEvent::Changed("42!\n".to_string()))
        );
        state.handle_event(&TuiEvent::Paste("a\r\nb".to_string()));
        assert_eq!(state.text(), "42!\na\nb");
        assert_eq!(state.caret(), (3, 2));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut state = OutputPaneState::new();
        state.load("abc");
        assert_eq!(state.handle_event(&TuiEvent::Backspace), None);

        assert_eq!(
            state.handle_event(&TuiEvent::Delete),
            Some(OutputEvent::Changed("bc".to_string()))
        );
        state.handle_event(&TuiEvent::CursorRight);
        assert_eq!(
            state.handle_event(&TuiEvent::Backspace),
            Some(OutputEvent::Changed("c".to_string()))
        );
    }

    #[test]
    fn test_typing_into_empty_pane() {
        let mut state = OutputPaneState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('x')),
            Some(OutputEvent::Changed("x".to_string()))
        );
    }

    #[test]
    fn test_caret_moves_do_not_emit() {
        let mut state = OutputPaneState::new();
        state.load("ab\ncd");
        assert_eq!(state.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(state.handle_event(&TuiEvent::CursorEnd), None);
        assert_eq!(state.caret(), (2, 3));
    }

    #[test]
    fn test_click_places_caret() {
        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        let mut state = OutputPaneState::new();
        state.load("abc\ndefgh");
        draw(&mut terminal, &mut state, Some(true));

        // Border puts text at x=1; line 2 is at y=2
        assert!(state.click(3, 2));
        assert_eq!(state.caret(), (2, 3));
        assert!(!state.click(0, 0));
    }
}
