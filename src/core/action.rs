//! # Actions
//!
//! Everything that can happen in runpad becomes an `Action`.
//! User presses Ctrl+S? That's `Action::Submit`.
//! The endpoint answers? That's `Action::ExecutionFinished`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` describing the I/O the caller must do.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::navigation::NavigationRequest;
use crate::core::state::{App, SubmissionResult};
use crate::core::submission;
use crate::executor::{ExecutionResponse, ExecutorError};

#[derive(Debug)]
pub enum Action {
    /// The editor content changed.
    EditDraft(String),
    /// Run the current draft.
    Submit,
    /// The in-flight request resolved.
    ExecutionFinished {
        id: Uuid,
        outcome: Result<ExecutionResponse, ExecutorError>,
    },
    /// Abort the in-flight request.
    CancelSubmission,
    /// The user edited the output text.
    EditOutput(String),
    /// Empty the output pane.
    ClearOutput,
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Persist `source`, then send it to the executor.
    BeginSubmission { id: Uuid, source: String },
    /// Signal the in-flight request to stop.
    CancelSubmission,
    /// Move the editor to a line.
    Navigate(NavigationRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::EditDraft(text) => {
            app.draft = text;
            Effect::None
        }
        Action::Submit => {
            if app.is_pending {
                debug!("Submit ignored: a submission is already pending");
                return Effect::None;
            }
            let id = Uuid::new_v4();
            info!("Submission {} started ({} bytes)", id, app.draft.len());
            app.is_pending = true;
            app.active_submission = Some(id);
            app.status_message = String::from("Executing...");
            Effect::BeginSubmission {
                id,
                source: app.draft.clone(),
            }
        }
        Action::ExecutionFinished { id, outcome } => {
            if app.active_submission != Some(id) {
                warn!(
                    "Submission {} finished but {:?} was active",
                    id, app.active_submission
                );
            }
            let (result, navigation) = submission::interpret(outcome);
            info!(
                "Submission {} finished: succeeded={}, status={:?}",
                id, result.succeeded, result.status
            );
            app.is_pending = false;
            app.active_submission = None;
            app.status_message = status_line(&result);
            app.result = Some(result);
            match navigation {
                Some(request) => Effect::Navigate(request),
                None => Effect::None,
            }
        }
        Action::CancelSubmission => {
            if app.is_pending {
                app.status_message = String::from("Cancelling...");
                Effect::CancelSubmission
            } else {
                Effect::None
            }
        }
        Action::EditOutput(text) => {
            match app.result.as_mut() {
                Some(result) => result.output_text = text,
                // Typed before any submission: nothing has succeeded yet
                None => {
                    app.result = Some(SubmissionResult {
                        output_text: text,
                        succeeded: false,
                        status: None,
                    })
                }
            }
            Effect::None
        }
        Action::ClearOutput => {
            if let Some(result) = app.result.as_mut() {
                result.output_text.clear();
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn status_line(result: &SubmissionResult) -> String {
    match (result.succeeded, result.status) {
        (true, Some(status)) => format!("Done (HTTP {status})"),
        (true, None) => String::from("Done"),
        (false, Some(status)) => format!("Failed (HTTP {status})"),
        (false, None) => String::from("Failed"),
    }
}
