use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::types::ExecutionResponse;

/// Errors that can occur while executing a submission remotely.
///
/// Remote rejections (HTTP 400, 401, ...) are not errors here: they arrive
/// as an `ExecutionResponse` carrying the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The response body was not the expected JSON shape.
    Parse(String),
    /// The request did not complete within the configured limit.
    Timeout(Duration),
    /// The user cancelled the request while it was in flight.
    Cancelled,
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorError::Network(msg) => write!(f, "{msg}"),
            ExecutorError::Parse(msg) => write!(f, "invalid response: {msg}"),
            ExecutorError::Timeout(limit) => {
                write!(f, "request timed out after {}s", limit.as_secs_f32())
            }
            ExecutorError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for ExecutorError {}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Returns the name of the executor (used in logs and the title bar).
    fn name(&self) -> &str;

    /// Sends `source` for execution and returns the status code and output text.
    async fn execute(&self, source: &str) -> Result<ExecutionResponse, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_displays_raw_message() {
        let err = ExecutorError::Network("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn test_timeout_display_includes_limit() {
        let err = ExecutorError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "request timed out after 5s");
    }

    #[test]
    fn test_cancelled_and_parse_display() {
        assert_eq!(ExecutorError::Cancelled.to_string(), "request cancelled");
        assert_eq!(
            ExecutorError::Parse("missing field".to_string()).to_string(),
            "invalid response: missing field"
        );
    }
}
