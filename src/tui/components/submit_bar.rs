//! # SubmitBar Component
//!
//! One-line strip between the editor and the output: the submit button
//! (or a spinner while a request is in flight), the verdict glyph of the
//! last result, and key hints.
//!
//! Stateless. `is_pending` and `verdict` come from the core `App`,
//! `spinner_frame` from the event loop clock.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const BUTTON_LABEL: &str = "[ Submit ]";
const PENDING_LABEL: &str = "Executing...";
const HINTS: &str = "Ctrl+S run · Esc cancel · F6 focus · Ctrl+L clear · Ctrl+Q quit";

pub struct SubmitBar {
    pub is_pending: bool,
    /// `Some(true)` succeeded, `Some(false)` failed, `None` before the first result
    pub verdict: Option<bool>,
    pub spinner_frame: usize,
}

impl SubmitBar {
    pub fn new(is_pending: bool, verdict: Option<bool>, spinner_frame: usize) -> Self {
        Self {
            is_pending,
            verdict,
            spinner_frame,
        }
    }

    /// Whether a click at (column, row) lands on the submit button.
    pub fn hit_button(area: Rect, column: u16, row: u16) -> bool {
        let button = Rect {
            width: (BUTTON_LABEL.len() as u16).min(area.width),
            height: 1u16.min(area.height),
            ..area
        };
        button.contains(Position::new(column, row))
    }
}

impl Component for SubmitBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if self.is_pending {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(
                format!("{spinner} {PENDING_LABEL}"),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::styled(
                BUTTON_LABEL,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        match self.verdict {
            Some(true) => spans.push(Span::raw(" ✅")),
            Some(false) => spans.push(Span::raw(" ❌")),
            None => {}
        }

        let hints_width = HINTS.chars().count() as u16;
        if area.width <= hints_width + BUTTON_LABEL.len() as u16 + 3 {
            frame.render_widget(Line::from(spans), area);
            return;
        }
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);
        frame.render_widget(Line::from(spans), left);
        frame.render_widget(
            Span::styled(HINTS, Style::default().fg(Color::DarkGray)),
            right,
        );
    }
}
