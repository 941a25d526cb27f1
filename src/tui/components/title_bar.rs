//! # TitleBar Component
//!
//! Top status line: app name, the endpoint submissions go to, and the
//! core's status message.
//!
//! Purely presentational. Both props come from `App`:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.endpoint.clone(), app.status_message.clone());
//! title_bar.render(frame, title_area);
//! ```
//!
//! The text is `"runpad | <endpoint> | <status>"`, or `"runpad | <endpoint>"`
//! when the status is empty.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// Execution endpoint URL
    pub endpoint: String,
    /// Status message (e.g. "Executing...", "Done (HTTP 200)")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(endpoint: String, status_message: String) -> Self {
        Self {
            endpoint,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("runpad", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::styled(self.endpoint.as_str(), Style::default().fg(Color::DarkGray)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(self.status_message.as_str()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
