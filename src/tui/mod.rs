//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Pending**: draws every ~80ms so the spinner turns.
//! - **Idle**: sleeps up to 500ms, only redraws on events, finished
//!   submissions or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::draft::load_initial_draft;
use crate::core::state::App;
use crate::core::submission::{CancelHandle, SubmissionContext, spawn_submission};
use crate::tui::component::EventHandler;
use crate::tui::components::{CodeEditor, EditorEvent, OutputEvent, OutputPaneState, SubmitBar};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Output,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub editor: CodeEditor,
    pub output: OutputPaneState,
    pub focus: Focus,
}

impl TuiState {
    pub fn new(draft: &str, language: &str, theme: &str) -> Self {
        Self {
            editor: CodeEditor::new(draft, language, theme),
            output: OutputPaneState::new(),
            focus: Focus::Editor,
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.editor.focused = focus == Focus::Editor;
        self.output.focused = focus == Focus::Output;
    }

    fn toggle_focus(&mut self) {
        match self.focus {
            Focus::Editor => self.set_focus(Focus::Output),
            Focus::Output => self.set_focus(Focus::Editor),
        }
    }
}

/// What the loop must do after an event.
enum Dispatch {
    Continue,
    Action(Action),
}

/// Route one terminal event to the focused pane or turn it into a core action.
fn dispatch(tui: &mut TuiState, event: &TuiEvent, layout: ui::UiLayout) -> Dispatch {
    match event {
        TuiEvent::ForceQuit => Dispatch::Action(Action::Quit),
        TuiEvent::Submit => Dispatch::Action(Action::Submit),
        TuiEvent::Escape => Dispatch::Action(Action::CancelSubmission),
        TuiEvent::ClearOutput => Dispatch::Action(Action::ClearOutput),
        TuiEvent::ToggleFocus => {
            tui.toggle_focus();
            Dispatch::Continue
        }
        TuiEvent::Resize => Dispatch::Continue,
        // The wheel always scrolls the output
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            tui.output.handle_event(event);
            Dispatch::Continue
        }
        TuiEvent::MouseClick(column, row) => {
            if SubmitBar::hit_button(layout.submit, *column, *row) {
                return Dispatch::Action(Action::Submit);
            }
            if tui.editor.click(*column, *row) {
                tui.set_focus(Focus::Editor);
            } else if tui.output.click(*column, *row) {
                tui.set_focus(Focus::Output);
            }
            Dispatch::Continue
        }
        _ => match tui.focus {
            Focus::Editor => match tui.editor.handle_event(event) {
                Some(EditorEvent::Changed(text)) => Dispatch::Action(Action::EditDraft(text)),
                None => Dispatch::Continue,
            },
            Focus::Output => match tui.output.handle_event(event) {
                Some(OutputEvent::Changed(text)) => Dispatch::Action(Action::EditOutput(text)),
                None => Dispatch::Continue,
            },
        },
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is enabled unconditionally; terminals that
        // don't support it ignore the escape sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// The core replaced or emptied the output text; show the new text.
fn reloads_output(action: &Action) -> bool {
    matches!(
        action,
        Action::ExecutionFinished { .. } | Action::ClearOutput
    )
}

/// Handles an `Effect` from `update()`. Returns true when the loop should exit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    ctx: &SubmissionContext,
    tx: &mpsc::Sender<Action>,
    in_flight: &mut Option<CancelHandle>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::BeginSubmission { id, source } => {
            *in_flight = Some(spawn_submission(ctx, id, source, tx.clone()));
        }
        Effect::CancelSubmission => {
            if let Some(handle) = in_flight.take() {
                handle.cancel();
            }
        }
        Effect::Navigate(request) => {
            info!("Navigating editor to line {}", request.line);
            request.apply(&mut tui.editor);
            tui.set_focus(Focus::Editor);
        }
        Effect::Quit => return true,
    }
    false
}

pub fn run(config: &ResolvedConfig, ctx: SubmissionContext) -> std::io::Result<()> {
    let draft = load_initial_draft(ctx.store.as_ref());
    let mut app = App::new(draft, config.endpoint.clone(), config.language.clone());
    let mut tui = TuiState::new(&app.draft, &app.language, &config.theme);
    tui.set_focus(Focus::Editor);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut in_flight: Option<CancelHandle> = None;

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if app.is_pending {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_pending {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        let layout = ui::layout(terminal.get_frame().area());
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Dispatch::Action(action) = dispatch(&mut tui, &event, layout) {
                let reload = reloads_output(&action);
                let effect = update(&mut app, action);
                if reload {
                    tui.output.load(app.output_text());
                }
                if apply_effect(effect, &mut tui, &ctx, &tx, &mut in_flight) {
                    break 'main;
                }
            }
        }

        // Finished submissions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if matches!(action, Action::ExecutionFinished { .. }) {
                in_flight = None;
            }
            let reload = reloads_output(&action);
            let effect = update(&mut app, action);
            if reload {
                tui.output.load(app.output_text());
            }
            if apply_effect(effect, &mut tui, &ctx, &tx, &mut in_flight) {
                break 'main;
            }
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.cancel();
    }
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::draft::MemoryDraftStore;
    use crate::executor::{ExecutionResponse, ExecutorError};
    use crate::test_support::{ScriptedExecutor, test_app};
    use ratatui::layout::Rect;
    use std::sync::Arc;

    fn layout() -> ui::UiLayout {
        ui::layout(Rect::new(0, 0, 80, 30))
    }

    #[test]
    fn test_typing_becomes_edit_action() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        match dispatch(&mut tui, &TuiEvent::InputChar('x'), layout()) {
            Dispatch::Action(Action::EditDraft(text)) => assert_eq!(text, "x"),
            _ => panic!("expected EditDraft"),
        }
    }

    #[test]
    fn test_output_focus_edits_output() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        tui.set_focus(Focus::Output);
        tui.output.load("42");
        dispatch(&mut tui, &TuiEvent::CursorEnd, layout());
        match dispatch(&mut tui, &TuiEvent::InputChar('!'), layout()) {
            Dispatch::Action(Action::EditOutput(text)) => assert_eq!(text, "42!"),
            _ => panic!("expected EditOutput"),
        }
        assert_eq!(tui.editor.text(), "");
    }

    #[test]
    fn test_output_edit_round_trips_through_core() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        tui.set_focus(Focus::Output);
        let mut app = test_app();

        if let Dispatch::Action(action) = dispatch(&mut tui, &TuiEvent::InputChar('x'), layout()) {
            update(&mut app, action);
        }
        assert_eq!(app.output_text(), "x");

        let action = Action::ClearOutput;
        assert!(reloads_output(&action));
        update(&mut app, action);
        tui.output.load(app.output_text());
        assert_eq!(tui.output.text(), "");
        assert!(!reloads_output(&Action::EditOutput(String::new())));
    }

    #[test]
    fn test_toggle_focus() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        dispatch(&mut tui, &TuiEvent::ToggleFocus, layout());
        assert_eq!(tui.focus, Focus::Output);
        assert!(tui.output.focused);
        assert!(!tui.editor.focused);
        dispatch(&mut tui, &TuiEvent::ToggleFocus, layout());
        assert_eq!(tui.focus, Focus::Editor);
    }

    #[test]
    fn test_global_keys_map_to_actions() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        assert!(matches!(
            dispatch(&mut tui, &TuiEvent::Submit, layout()),
            Dispatch::Action(Action::Submit)
        ));
        assert!(matches!(
            dispatch(&mut tui, &TuiEvent::Escape, layout()),
            Dispatch::Action(Action::CancelSubmission)
        ));
        assert!(matches!(
            dispatch(&mut tui, &TuiEvent::ClearOutput, layout()),
            Dispatch::Action(Action::ClearOutput)
        ));
        assert!(matches!(
            dispatch(&mut tui, &TuiEvent::ForceQuit, layout()),
            Dispatch::Action(Action::Quit)
        ));
    }

    #[test]
    fn test_click_on_submit_button() {
        let mut tui = TuiState::new("", "python", "base16-ocean.dark");
        let areas = layout();
        assert!(matches!(
            dispatch(
                &mut tui,
                &TuiEvent::MouseClick(areas.submit.x + 2, areas.submit.y),
                areas
            ),
            Dispatch::Action(Action::Submit)
        ));
    }

    #[test]
    fn test_navigate_effect_moves_editor() {
        let mut tui = TuiState::new("a\nb\nc\nd", "python", "base16-ocean.dark");
        tui.set_focus(Focus::Output);
        let ctx = SubmissionContext::new(
            Arc::new(MemoryDraftStore::new()),
            Arc::new(ScriptedExecutor::new(Err(ExecutorError::Cancelled))),
            Duration::from_secs(1),
        );
        let (tx, _rx) = mpsc::channel();
        let mut in_flight = None;

        let mut app = test_app();
        app.is_pending = true;
        let effect = update(
            &mut app,
            Action::ExecutionFinished {
                id: uuid::Uuid::new_v4(),
                outcome: Ok(ExecutionResponse {
                    status: 400,
                    output: "Syntax error at line 3".to_string(),
                }),
            },
        );
        let quit = apply_effect(effect, &mut tui, &ctx, &tx, &mut in_flight);

        assert!(!quit);
        assert_eq!(tui.focus, Focus::Editor);
        assert_eq!(tui.editor.caret(), (3, 1));
    }
}
