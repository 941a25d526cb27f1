//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::draft::{DRAFT_KEY, DraftStore};
use crate::core::navigation::EditorAdapter;
use crate::core::state::App;
use crate::executor::{ExecutionResponse, Executor, ExecutorError};

/// An executor that always answers with the same outcome.
pub struct ScriptedExecutor {
    outcome: Result<ExecutionResponse, ExecutorError>,
    delay: Option<Duration>,
    watched_store: Option<Arc<dyn DraftStore>>,
    calls: AtomicUsize,
    seen_drafts: Mutex<Vec<Option<String>>>,
}

impl ScriptedExecutor {
    pub fn new(outcome: Result<ExecutionResponse, ExecutorError>) -> Self {
        Self {
            outcome,
            delay: None,
            watched_store: None,
            calls: AtomicUsize::new(0),
            seen_drafts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Record what `store` holds under the draft key each time `execute` runs.
    pub fn watching_drafts(mut self, store: Arc<dyn DraftStore>) -> Self {
        self.watched_store = Some(store);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_drafts(&self) -> Vec<Option<String>> {
        self.seen_drafts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, _source: &str) -> Result<ExecutionResponse, ExecutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(store) = &self.watched_store {
            self.seen_drafts.lock().unwrap().push(store.get(DRAFT_KEY));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

/// Records every adapter call as a short string.
#[derive(Default)]
pub struct RecordingEditor {
    pub calls: Vec<String>,
}

impl EditorAdapter for RecordingEditor {
    fn focus(&mut self) {
        self.calls.push("focus".to_string());
    }

    fn reveal_line(&mut self, line: usize) {
        self.calls.push(format!("reveal {line}"));
    }

    fn set_caret(&mut self, line: usize, column: usize) {
        self.calls.push(format!("caret {line}:{column}"));
    }
}

/// Creates a test App with an empty draft.
pub fn test_app() -> App {
    App::new(
        String::new(),
        "http://localhost:5000/execute".to_string(),
        "python".to_string(),
    )
}
