//! Integration tests for the analysis client.
//!
//! Each test runs a local axum server on its own runtime thread and talks to
//! it with the blocking client.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use hostscope_analysis::{analyze, AnalysisClient, AnalysisError, AnalysisSettings, TEMPERATURE};
use hostscope_telemetry::{TelemetryCollector, TelemetrySnapshot};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const PATH: &str = "/v1/chat/completions";

type Captured = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

/// Serve `app` on an ephemeral port and return the endpoint URL.
fn spawn_server(app: Router) -> String {
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test runtime");

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test listener");
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = rx.recv().expect("Test server did not start");
    format!("http://{addr}{PATH}")
}

fn snapshot() -> TelemetrySnapshot {
    TelemetryCollector::new().collect()
}

fn client(endpoint: String, timeout_secs: f64) -> AnalysisClient {
    AnalysisClient::new(AnalysisSettings {
        api_key: "sk-test".to_string(),
        model: "test-model".to_string(),
        endpoint,
        timeout_secs,
    })
    .expect("Failed to build client")
}

async fn capture(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.lock().unwrap().push((headers, body));
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": " hello "}}]
    }))
}

/// Test the happy path: request shape, headers and extracted text.
#[test]
fn test_successful_analysis() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route(PATH, post(capture))
        .with_state(captured.clone());
    let endpoint = spawn_server(app);

    let snapshot = snapshot();
    let result = client(endpoint, 5.0).analyze(&snapshot).unwrap();

    assert_eq!(result.analysis, "hello");
    assert_eq!(result.raw_response["id"], "chatcmpl-1");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (headers, body) = &captured[0];

    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(headers["content-type"], "application/json");

    assert_eq!(body["model"], "test-model");
    assert_eq!(body["temperature"], TEMPERATURE);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");

    let expected_block = format!("```json\n{}\n```", snapshot.to_json().unwrap());
    assert!(messages[1]["content"].as_str().unwrap().ends_with(&expected_block));
}

/// Test that a response without answer text is not an error.
#[test]
fn test_empty_choices_yield_empty_analysis() {
    let app = Router::new()
        .route(PATH, post(|| async { Json(json!({"choices": []})) }))
        .route("/empty", post(|| async { Json(json!({})) }));
    let endpoint = spawn_server(app);

    let result = client(endpoint.clone(), 5.0).analyze(&snapshot()).unwrap();
    assert_eq!(result.analysis, "");
    assert_eq!(result.raw_response, json!({"choices": []}));

    let endpoint = endpoint.replace(PATH, "/empty");
    let result = client(endpoint, 5.0).analyze(&snapshot()).unwrap();
    assert_eq!(result.analysis, "");
    assert_eq!(result.raw_response, json!({}));
}

/// Test that a non-2xx status carries the status code and body.
#[test]
fn test_unauthorized_is_protocol_error() {
    let app = Router::new().route(
        PATH,
        post(|| async { (StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#) }),
    );
    let endpoint = spawn_server(app);

    let err = client(endpoint, 5.0).analyze(&snapshot()).unwrap_err();
    match err {
        AnalysisError::Http { status, ref body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":"bad key"}"#);
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("bad key"));
}

/// Test that an error body with invalid UTF-8 is still reported.
#[test]
fn test_error_body_decoding_is_tolerant() {
    let app = Router::new().route(
        PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, vec![0xff, b'o', b'k']) }),
    );
    let endpoint = spawn_server(app);

    let err = client(endpoint, 5.0).analyze(&snapshot()).unwrap_err();
    assert_eq!(err.status(), Some(500));
    match err {
        AnalysisError::Http { body, .. } => assert!(body.ends_with("ok")),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

/// Test that a slow endpoint trips the timeout exactly once.
#[test]
fn test_timeout_is_transport_error_without_retry() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        PATH,
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"choices": []}))
            }
        }),
    );
    let endpoint = spawn_server(app);

    let started = Instant::now();
    let err = client(endpoint, 0.3).analyze(&snapshot()).unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// Test that a refused connection is a transport error.
#[test]
fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}{PATH}"), 5.0)
        .analyze(&snapshot())
        .unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

/// Test that a 2xx body that is not JSON is reported.
#[test]
fn test_non_json_success_body() {
    let app = Router::new().route(PATH, post(|| async { "definitely not json" }));
    let endpoint = spawn_server(app);

    let err = client(endpoint, 5.0).analyze(&snapshot()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidResponse(_)));
}

/// Test the one-shot helper, including the missing-key check.
#[test]
fn test_analyze_helper() {
    let app = Router::new().route(
        PATH,
        post(|| async { Json(json!({"choices": [{"message": {"content": "fine"}}]})) }),
    );
    let endpoint = spawn_server(app);

    let result = analyze(&snapshot(), "m", &endpoint, "sk-test", 5.0).unwrap();
    assert_eq!(result.analysis, "fine");

    let err = analyze(&snapshot(), "m", &endpoint, "", 5.0).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingApiKey));
}
