//! # Application State
//!
//! Core business state for runpad. No TUI types here; presentation state
//! lives in the `tui` module.
//!
//! ```text
//! App
//! ├── draft: String                       // current editor text
//! ├── is_pending: bool                    // a submission is in flight
//! ├── active_submission: Option<Uuid>     // id of the in-flight submission
//! ├── result: Option<SubmissionResult>    // latest result, replaced each time
//! ├── status_message: String              // status bar text
//! ├── endpoint: String                    // where submissions go
//! └── language: String                    // highlighting language
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use uuid::Uuid;

/// Output of one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub output_text: String,
    pub succeeded: bool,
    /// HTTP status, `None` when no response arrived (network error, timeout, cancel).
    pub status: Option<u16>,
}

pub struct App {
    pub draft: String,
    pub is_pending: bool,
    pub active_submission: Option<Uuid>,
    pub result: Option<SubmissionResult>,
    pub status_message: String,
    pub endpoint: String,
    pub language: String,
}

impl App {
    pub fn new(draft: String, endpoint: String, language: String) -> Self {
        Self {
            draft,
            is_pending: false,
            active_submission: None,
            result: None,
            status_message: String::from("Ctrl+S to run"),
            endpoint,
            language,
        }
    }

    /// Whether the last submission succeeded. False before the first one.
    pub fn succeeded(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.succeeded)
    }

    /// Text for the output pane (empty before the first submission).
    pub fn output_text(&self) -> &str {
        self.result.as_ref().map_or("", |r| r.output_text.as_str())
    }
}
