//! HTTP execution endpoint client.
//!
//! The endpoint takes the raw source as a `text/plain` POST body and answers
//! with JSON (`{"output": "..."}`). No authentication is attached. The status
//! code is passed through untouched; deciding what it means is the
//! controller's job.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::client::{Executor, ExecutorError};
use super::types::{ExecutionResponse, ResponseBody};

pub const DEFAULT_ENDPOINT: &str = "https://python-exec-714558093143.us-central1.run.app/execute";

pub struct HttpExecutor {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpExecutor {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turns a raw response body into displayable text.
fn parse_body(raw: &str) -> Result<String, ExecutorError> {
    let body: ResponseBody =
        serde_json::from_str(raw).map_err(|e| ExecutorError::Parse(e.to_string()))?;
    body.into_text()
        .ok_or_else(|| ExecutorError::Parse("response has no `output` field".to_string()))
}

#[async_trait]
impl Executor for HttpExecutor {
    fn name(&self) -> &str {
        "http"
    }

    async fn execute(&self, source: &str) -> Result<ExecutionResponse, ExecutorError> {
        info!(
            "Execution request: endpoint={}, source_len={}",
            self.endpoint,
            source.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/plain")
            .body(source.to_string())
            .send()
            .await
            .map_err(|e| ExecutorError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        debug!("Execution response status: {}", status);

        let raw = response
            .text()
            .await
            .map_err(|e| ExecutorError::Network(e.to_string()))?;

        let output = parse_body(&raw).inspect_err(|e| {
            warn!("Unparseable execution response (HTTP {}): {}", status, e);
        })?;

        Ok(ExecutionResponse { status, output })
    }
}
