use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{OutputPane, SubmitBar, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub title: Rect,
    pub editor: Rect,
    pub submit: Rect,
    pub output: Rect,
}

/// Split the frame: title line, editor (60%), submit bar, output (rest).
pub fn layout(area: Rect) -> UiLayout {
    use Constraint::{Length, Min, Percentage};
    let [title, editor, submit, output] =
        Layout::vertical([Length(1), Percentage(60), Length(1), Min(3)]).areas(area);
    UiLayout {
        title,
        editor,
        submit,
        output,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let areas = layout(frame.area());

    TitleBar::new(app.endpoint.clone(), app.status_message.clone()).render(frame, areas.title);

    tui.editor.render(frame, areas.editor);

    let verdict = app.result.as_ref().map(|r| r.succeeded);
    SubmitBar::new(app.is_pending, verdict, spinner_frame).render(frame, areas.submit);

    OutputPane::new(&mut tui.output, verdict).render(frame, areas.output);
}
