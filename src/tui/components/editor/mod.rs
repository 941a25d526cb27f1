//! # CodeEditor Component
//!
//! Multi-line source editor with a line-number gutter and syntax highlighting.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and deletions
//! - Caret movement (arrows, Home/End, PageUp/PageDown, mouse click)
//! - Keep the caret inside the viewport while editing
//! - Report every content change as `EditorEvent::Changed` (the core's
//!   `EditDraft` action)
//! - Act as the core's `EditorAdapter` for syntax error navigation
//!
//! ## State Management
//!
//! The buffer and caret are internal state. The core keeps its own copy of
//! the draft, fed by `Changed` events; the editor never reads it back.
//! Highlighted lines are cached and rebuilt only when `revision` moves.

mod highlight;
pub(in crate::tui) mod lines;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::navigation::EditorAdapter;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use lines::{
    column_at_display, display_width, line_count, line_starts, line_text, next_char_boundary,
    offset_of, position_of, prev_char_boundary,
};

const INDENT: &str = "    ";

/// High-level events emitted by the CodeEditor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The text changed; carries the full new content.
    Changed(String),
}

pub struct CodeEditor {
    buffer: String,
    /// Caret as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible line (0-based)
    scroll_top: usize,
    /// First visible display column
    scroll_left: usize,
    /// Content rows from the last render
    viewport_height: usize,
    /// Content columns from the last render
    viewport_width: usize,
    /// Whether keyboard input goes here (Prop)
    pub focused: bool,
    /// Highlighting language (Prop)
    pub language: String,
    theme: String,
    revision: u64,
    highlighted: Option<(u64, Vec<Line<'static>>)>,
    /// Screen area of the text (excluding gutter and border) from the last render
    text_area: Rect,
}

impl CodeEditor {
    const DEFAULT_HEIGHT: usize = 20;
    const DEFAULT_WIDTH: usize = 80;

    pub fn new(text: &str, language: &str, theme: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: 0,
            scroll_top: 0,
            scroll_left: 0,
            viewport_height: Self::DEFAULT_HEIGHT,
            viewport_width: Self::DEFAULT_WIDTH,
            focused: true,
            language: language.to_string(),
            theme: theme.to_string(),
            revision: 0,
            highlighted: None,
            text_area: Rect::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Caret as 1-based (line, column).
    pub fn caret(&self) -> (usize, usize) {
        let (line, col) = position_of(&self.buffer, self.cursor);
        (line + 1, col + 1)
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Place the caret at a screen cell, if it lies in the text area.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        if !self.text_area.contains(Position::new(column, row)) {
            return false;
        }
        let line = self.scroll_top + (row - self.text_area.y) as usize;
        let line = line.min(line_count(&self.buffer) - 1);
        let display_col = self.scroll_left + (column - self.text_area.x) as usize;
        let col = column_at_display(line_text(&self.buffer, line), display_col);
        self.cursor = offset_of(&self.buffer, line, col);
        self.focused = true;
        true
    }

    fn changed(&mut self) -> Option<EditorEvent> {
        self.revision += 1;
        self.ensure_caret_visible();
        Some(EditorEvent::Changed(self.buffer.clone()))
    }

    fn insert(&mut self, text: &str) -> Option<EditorEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.changed()
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

    fn ensure_caret_visible(&mut self) {
        let (line, _) = position_of(&self.buffer, self.cursor);
        let height = self.viewport_height.max(1);
        if line < self.scroll_top {
            self.scroll_top = line;
        } else if line >= self.scroll_top + height {
            self.scroll_top = line + 1 - height;
        }

        let line_start = line_starts(&self.buffer)[line];
        let col = display_width(&self.buffer[line_start..self.cursor]);
        let width = self.viewport_width.max(1);
        if col < self.scroll_left {
            self.scroll_left = col;
        } else if col >= self.scroll_left + width {
            self.scroll_left = col + 1 - width;
        }
    }

    fn highlighted_lines(&mut self) -> &[Line<'static>] {
        let stale = !matches!(&self.highlighted, Some((rev, _)) if *rev == self.revision);
        if stale {
            let lines = highlight::highlight(&self.buffer, &self.language, &self.theme);
            self.highlighted = Some((self.revision, lines));
        }
        match &self.highlighted {
            Some((_, lines)) => lines,
            None => &[],
        }
    }
}

impl EditorAdapter for CodeEditor {
    fn focus(&mut self) {
        self.focused = true;
    }

    /// Scrolls so `line` sits mid-viewport, unless it is already visible.
    fn reveal_line(&mut self, line: usize) {
        let target = line.saturating_sub(1).min(line_count(&self.buffer) - 1);
        let height = self.viewport_height.max(1);
        if target < self.scroll_top || target >= self.scroll_top + height {
            self.scroll_top = target.saturating_sub(height / 2);
        }
    }

    fn set_caret(&mut self, line: usize, column: usize) {
        let offset = offset_of(
            &self.buffer,
            line.saturating_sub(1),
            column.saturating_sub(1),
        );
        self.move_to(offset);
    }
}

impl Component for CodeEditor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!("Editor ({})", self.language));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let total = line_count(&self.buffer);
        let gutter_width = (total.to_string().len().max(3) + 1) as u16;
        let gutter = Rect {
            width: gutter_width.min(inner.width),
            ..inner
        };
        let text_area = Rect {
            x: inner.x + gutter.width,
            width: inner.width.saturating_sub(gutter.width),
            ..inner
        };

        self.viewport_height = text_area.height as usize;
        self.viewport_width = text_area.width as usize;
        self.text_area = text_area;
        self.scroll_top = self.scroll_top.min(total.saturating_sub(1));

        let top = self.scroll_top;
        let height = text_area.height as usize;
        let (caret_line, _) = position_of(&self.buffer, self.cursor);

        let numbers: Vec<Line<'static>> = (top..total.min(top + height))
            .map(|i| {
                let style = if i == caret_line {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::styled(format!("{:>w$} ", i + 1, w = gutter_width as usize - 1), style)
            })
            .collect();
        frame.render_widget(Paragraph::new(numbers), gutter);

        let scroll_left = self.scroll_left.min(u16::MAX as usize) as u16;
        let visible: Vec<Line<'static>> = self
            .highlighted_lines()
            .iter()
            .skip(top)
            .take(height)
            .cloned()
            .collect();
        frame.render_widget(Paragraph::new(visible).scroll((0, scroll_left)), text_area);

        if self.focused {
            let line_start = line_starts(&self.buffer)[caret_line];
            let col = display_width(&self.buffer[line_start..self.cursor]);
            if caret_line >= top
                && caret_line < top + height
                && col >= self.scroll_left
                && col < self.scroll_left + text_area.width as usize
            {
                frame.set_cursor_position((
                    text_area.x + (col - self.scroll_left) as u16,
                    text_area.y + (caret_line - top) as u16,
                ));
            }
        }
    }
}

impl EventHandler for CodeEditor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            TuiEvent::Newline => {
                // Carry the current line's indentation over
                let (line, _) = position_of(&self.buffer, self.cursor);
                let indent: String = line_text(&self.buffer, line)
                    .chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .collect();
                self.insert(&format!("\n{indent}"))
            }
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
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.move_to(line_start);
                None
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                self.move_to(line_end);
                None
            }
            TuiEvent::PageUp => {
                self.move_lines(-(self.viewport_height.max(1) as isize));
                None
            }
            TuiEvent::PageDown => {
                self.move_lines(self.viewport_height.max(1) as isize);
                None
            }
            _ => None,
        }
    }
}
