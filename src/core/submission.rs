//! # Submission Lifecycle
//!
//! Glue between the pure reducer and the outside world:
//!
//! ```text
//! update(Submit) ─► Effect::BeginSubmission
//!                        │
//!                        ▼
//!        persist_draft()  (store.set, before any request)
//!                        │
//!                        ▼
//!        execute_bounded()  races executor / timeout / cancel
//!                        │
//!                        ▼
//! update(ExecutionFinished) ─► interpret() ─► SubmissionResult (+ NavigationRequest)
//! ```
//!
//! The TUI drives this with `spawn_submission()`; `--run` uses `HeadlessRunner`.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::core::action::{Action, Effect, update};
use crate::core::diagnostics::syntax_error_line;
use crate::core::draft::{DRAFT_KEY, DraftStore};
use crate::core::navigation::NavigationRequest;
use crate::core::state::{App, SubmissionResult};
use crate::executor::{ExecutionResponse, Executor, ExecutorError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const UNKNOWN_ERROR: &str = "Unknown error";

// ============================================================================
// Interpretation
// ============================================================================

/// How a status code is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 200
    Succeeded,
    /// 400 or 401: the service refused the code. May carry a syntax error position.
    Rejected,
    /// Any other status. Shown as a failure.
    Unexpected,
}

pub fn classify(status: u16) -> Verdict {
    match status {
        200 => Verdict::Succeeded,
        400 | 401 => Verdict::Rejected,
        _ => Verdict::Unexpected,
    }
}

/// Turns a finished request into the result to display and, for rejected
/// syntax errors with a position, a navigation request.
pub fn interpret(
    outcome: Result<ExecutionResponse, ExecutorError>,
) -> (SubmissionResult, Option<NavigationRequest>) {
    match outcome {
        Ok(ExecutionResponse { status, output }) => {
            let verdict = classify(status);
            let navigation = match verdict {
                Verdict::Rejected => syntax_error_line(&output).map(NavigationRequest::new),
                Verdict::Succeeded | Verdict::Unexpected => None,
            };
            if verdict == Verdict::Unexpected {
                debug!("Status {} treated as failure", status);
            }
            let result = SubmissionResult {
                output_text: output,
                succeeded: verdict == Verdict::Succeeded,
                status: Some(status),
            };
            (result, navigation)
        }
        Err(e) => {
            let message = e.to_string();
            let output_text = if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            let result = SubmissionResult {
                output_text,
                succeeded: false,
                status: None,
            };
            (result, None)
        }
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Writes the draft to the store. A failed write is logged, not fatal.
pub fn persist_draft(store: &dyn DraftStore, source: &str) {
    if let Err(e) = store.set(DRAFT_KEY, source) {
        warn!("Failed to persist draft: {}", e);
    }
}

/// Sender half of a submission's cancel signal. Dropping it does not cancel.
pub struct CancelHandle(oneshot::Sender<()>);

impl CancelHandle {
    pub fn cancel(self) {
        // The request may already have finished; nothing to do then.
        let _ = self.0.send(());
    }
}

pub fn cancel_pair() -> (CancelHandle, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle(tx), rx)
}

/// Runs one request, bounded by `timeout` and abortable through `cancel`.
pub async fn execute_bounded(
    executor: &dyn Executor,
    source: &str,
    timeout: Duration,
    cancel: oneshot::Receiver<()>,
) -> Result<ExecutionResponse, ExecutorError> {
    tokio::select! {
        biased;
        Ok(()) = cancel => Err(ExecutorError::Cancelled),
        outcome = tokio::time::timeout(timeout, executor.execute(source)) => {
            outcome.unwrap_or(Err(ExecutorError::Timeout(timeout)))
        }
    }
}

/// Everything a submission needs besides the source text.
#[derive(Clone)]
pub struct SubmissionContext {
    pub store: Arc<dyn DraftStore>,
    pub executor: Arc<dyn Executor>,
    pub timeout: Duration,
}

impl SubmissionContext {
    pub fn new(store: Arc<dyn DraftStore>, executor: Arc<dyn Executor>, timeout: Duration) -> Self {
        Self {
            store,
            executor,
            timeout,
        }
    }
}

/// Persists `source`, then runs the request on a tokio task. The outcome is
/// delivered on `tx` as `Action::ExecutionFinished`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_submission(
    ctx: &SubmissionContext,
    id: Uuid,
    source: String,
    tx: mpsc::Sender<Action>,
) -> CancelHandle {
    persist_draft(ctx.store.as_ref(), &source);

    let (handle, cancel) = cancel_pair();
    let executor = ctx.executor.clone();
    let timeout = ctx.timeout;

    info!("Spawning submission {} via {}", id, executor.name());
    tokio::spawn(async move {
        let outcome = execute_bounded(executor.as_ref(), &source, timeout, cancel).await;
        if let Err(e) = &outcome {
            info!("Submission {} failed: {}", id, e);
        }
        if tx.send(Action::ExecutionFinished { id, outcome }).is_err() {
            warn!("Failed to deliver result of submission {}: receiver dropped", id);
        }
    });

    handle
}

// ============================================================================
// Headless
// ============================================================================

/// Runs submissions to completion without a terminal.
pub struct HeadlessRunner {
    ctx: SubmissionContext,
}

impl HeadlessRunner {
    pub fn new(ctx: SubmissionContext) -> Self {
        Self { ctx }
    }

    /// Submits `app.draft` and waits for the result, which lands in
    /// `app.result`. Returns the navigation request, if any. A no-op when a
    /// submission is already pending.
    pub async fn submit(&self, app: &mut App) -> Option<NavigationRequest> {
        let (id, source) = match update(app, Action::Submit) {
            Effect::BeginSubmission { id, source } => (id, source),
            _ => return None,
        };

        persist_draft(self.ctx.store.as_ref(), &source);
        // Keep the handle alive so the cancel branch never fires.
        let (_handle, cancel) = cancel_pair();
        let outcome =
            execute_bounded(self.ctx.executor.as_ref(), &source, self.ctx.timeout, cancel).await;

        match update(app, Action::ExecutionFinished { id, outcome }) {
            Effect::Navigate(request) => Some(request),
            _ => None,
        }
    }
}
