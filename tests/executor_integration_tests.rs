use std::sync::Arc;
use std::time::Duration;

use runpad::core::draft::{DRAFT_KEY, DraftStore, FileDraftStore};
use runpad::core::state::App;
use runpad::core::submission::{HeadlessRunner, SubmissionContext, cancel_pair, execute_bounded};
use runpad::executor::{Executor, ExecutorError, HttpExecutor};
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Starts a mock endpoint that answers POST /execute with `status` and `body`.
async fn mock_endpoint(status: u16, body: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&mock_server)
        .await;
    mock_server
}

fn executor_for(server: &MockServer) -> HttpExecutor {
    HttpExecutor::new(Some(format!("{}/execute", server.uri())))
}

/// An endpoint URL nothing is listening on.
fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/execute")
}

// ============================================================================
// HttpExecutor
// ============================================================================

#[tokio::test]
async fn test_sends_raw_source_as_text_plain() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("print(6 * 7)"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": "42\n"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = assert_ok!(executor_for(&mock_server).execute("print(6 * 7)").await);

    assert_eq!(response.status, 200);
    assert_eq!(response.output, "42\n");
}

#[tokio::test]
async fn test_rejected_status_passes_through() {
    let mock_server = mock_endpoint(
        400,
        serde_json::json!({"output": "Syntax error at line 3: invalid syntax"}),
    )
    .await;

    let response = assert_ok!(executor_for(&mock_server).execute("x = (").await);

    assert_eq!(response.status, 400);
    assert_eq!(response.output, "Syntax error at line 3: invalid syntax");
}

#[tokio::test]
async fn test_error_body_used_as_output() {
    let mock_server = mock_endpoint(400, serde_json::json!({"error": "No code provided"})).await;

    let response = assert_ok!(executor_for(&mock_server).execute("").await);

    assert_eq!(response.status, 400);
    assert_eq!(response.output, "No code provided");
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(executor_for(&mock_server).execute("print(1)").await);

    assert!(matches!(err, ExecutorError::Parse(_)));
}

#[tokio::test]
async fn test_body_without_output_is_parse_error() {
    let mock_server = mock_endpoint(200, serde_json::json!({"result": "42"})).await;

    let err = assert_err!(executor_for(&mock_server).execute("print(1)").await);

    assert!(matches!(err, ExecutorError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let executor = HttpExecutor::new(Some(closed_endpoint()));

    let err = assert_err!(executor.execute("print(1)").await);

    assert!(matches!(err, ExecutorError::Network(_)));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"output": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let (_handle, cancel) = cancel_pair();
    let outcome = execute_bounded(
        &executor_for(&mock_server),
        "import time",
        Duration::from_millis(100),
        cancel,
    )
    .await;

    assert_eq!(
        outcome,
        Err(ExecutorError::Timeout(Duration::from_millis(100)))
    );
}

// ============================================================================
// Full submission flow
// ============================================================================

struct Harness {
    _dir: tempfile::TempDir,
    store: Arc<FileDraftStore>,
    runner: HeadlessRunner,
}

fn harness(endpoint: String) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("drafts.json")));
    let ctx = SubmissionContext::new(
        store.clone(),
        Arc::new(HttpExecutor::new(Some(endpoint))),
        Duration::from_secs(5),
    );
    Harness {
        _dir: dir,
        store,
        runner: HeadlessRunner::new(ctx),
    }
}

fn app_with(draft: &str) -> App {
    App::new(
        draft.to_string(),
        "http://test/execute".to_string(),
        "python".to_string(),
    )
}

#[tokio::test]
async fn test_successful_submission() {
    let mock_server = mock_endpoint(200, serde_json::json!({"output": "42"})).await;
    let h = harness(format!("{}/execute", mock_server.uri()));
    let mut app = app_with("print(42)");

    let navigation = h.runner.submit(&mut app).await;

    assert_eq!(navigation, None);
    assert!(!app.is_pending);
    assert!(app.succeeded());
    assert_eq!(app.output_text(), "42");
    assert_eq!(app.status_message, "Done (HTTP 200)");
    assert_eq!(h.store.get(DRAFT_KEY), Some("print(42)".to_string()));
}

#[tokio::test]
async fn test_syntax_error_requests_navigation() {
    let mock_server = mock_endpoint(
        400,
        serde_json::json!({"output": "Syntax error at line 7: invalid syntax"}),
    )
    .await;
    let h = harness(format!("{}/execute", mock_server.uri()));
    let mut app = app_with("def f(:\n    pass");

    let navigation = h.runner.submit(&mut app).await;

    assert_eq!(navigation.map(|n| n.line), Some(7));
    assert!(!app.succeeded());
    assert_eq!(app.status_message, "Failed (HTTP 400)");
}

#[tokio::test]
async fn test_unauthorized_syntax_error_also_navigates() {
    let mock_server = mock_endpoint(
        401,
        serde_json::json!({"output": "Syntax error on line 2"}),
    )
    .await;
    let h = harness(format!("{}/execute", mock_server.uri()));
    let mut app = app_with("x\ny(");

    let navigation = h.runner.submit(&mut app).await;

    assert_eq!(navigation.map(|n| n.line), Some(2));
}

#[tokio::test]
async fn test_server_error_fails_without_navigation() {
    let mock_server = mock_endpoint(
        500,
        serde_json::json!({"output": "Syntax error at line 1"}),
    )
    .await;
    let h = harness(format!("{}/execute", mock_server.uri()));
    let mut app = app_with("print(1)");

    let navigation = h.runner.submit(&mut app).await;

    assert_eq!(navigation, None);
    assert!(!app.succeeded());
    assert_eq!(app.output_text(), "Syntax error at line 1");
    assert_eq!(app.status_message, "Failed (HTTP 500)");
}

#[tokio::test]
async fn test_draft_persisted_even_when_request_fails() {
    let h = harness(closed_endpoint());
    let mut app = app_with("print('kept')");

    h.runner.submit(&mut app).await;

    assert!(!app.is_pending);
    assert!(!app.succeeded());
    assert!(!app.output_text().is_empty());
    assert_eq!(app.result.as_ref().and_then(|r| r.status), None);
    assert_eq!(h.store.get(DRAFT_KEY), Some("print('kept')".to_string()));
}

#[tokio::test]
async fn test_sequential_submissions_hit_endpoint_twice() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": "1"})))
        .expect(2)
        .mount(&mock_server)
        .await;
    let h = harness(format!("{}/execute", mock_server.uri()));
    let mut app = app_with("print(1)");

    h.runner.submit(&mut app).await;
    let first = app.result.clone();
    h.runner.submit(&mut app).await;

    assert_eq!(first, app.result);
    assert!(app.succeeded());
}
