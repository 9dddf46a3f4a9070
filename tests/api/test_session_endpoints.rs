// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Session endpoint tests
//!
//! Requests go straight into the router with `oneshot`; the analyzer is a
//! local stub so no network is involved.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fog_lpr_workbench::{
    api::{create_app, session::MAX_ENCODED_IMAGE_SIZE, AppState},
    recognition::{AnalysisError, PlateAnalyzer, RecognitionOutcome},
    vision::ImagePayload,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower::util::ServiceExt;

const TINY_PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Always answers with the same outcome or error
struct StubAnalyzer {
    answer: Result<RecognitionOutcome, AnalysisError>,
}

#[async_trait]
impl PlateAnalyzer for StubAnalyzer {
    async fn analyze(&self, _image: &ImagePayload) -> Result<RecognitionOutcome, AnalysisError> {
        self.answer.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Blocks until released, then succeeds
struct GatedAnalyzer {
    release: Notify,
}

#[async_trait]
impl PlateAnalyzer for GatedAnalyzer {
    async fn analyze(&self, _image: &ImagePayload) -> Result<RecognitionOutcome, AnalysisError> {
        self.release.notified().await;
        Ok(RecognitionOutcome::new("沪C55555", "蓝", 0.8))
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

fn app_with(analyzer: Arc<dyn PlateAnalyzer>) -> Router {
    create_app(Arc::new(AppState::new(analyzer)))
}

fn succeeding_app() -> Router {
    app_with(Arc::new(StubAnalyzer {
        answer: Ok(RecognitionOutcome::new("京A88888", "蓝", 0.93)),
    }))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "idle");
    body["sessionId"].as_str().unwrap().to_string()
}

async fn select_image(app: &Router, id: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/v1/sessions/{}/image", id),
        Some(json!({ "image": TINY_PNG_DATA_URL })),
    )
    .await
}

#[tokio::test]
async fn test_full_recognition_flow() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let (status, snapshot) = select_image(&app, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["hasImage"], true);
    assert_eq!(snapshot["state"], "idle");

    let (status, snapshot) = send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"], "succeeded");
    let result = &snapshot["currentResult"];
    assert_eq!(result["plateNumber"], "京A88888");
    assert_eq!(result["color"], "蓝");
    assert_eq!(result["confidence"], 0.93);
    assert_eq!(result["algorithm"], "darkChannelPrior");
    assert_eq!(result["sourceImage"]["mimeType"], "image/png");
    assert!(result["latencySeconds"].as_f64().unwrap() >= 0.0);
    assert_eq!(snapshot["historyLen"], 1);

    let (status, history) = send(&app, "GET", &format!("/v1/sessions/{}/history", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["count"], 1);
    assert_eq!(history["records"][0]["plateNumber"], "京A88888");
    assert_eq!(history["averageConfidence"], 0.93);
}

#[tokio::test]
async fn test_history_newest_first_and_clear() {
    let app = succeeding_app();
    let id = create_session(&app).await;
    select_image(&app, &id).await;

    for _ in 0..3 {
        let (status, _) = send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, history) = send(&app, "GET", &format!("/v1/sessions/{}/history", id), None).await;
    assert_eq!(history["count"], 3);

    let (status, cleared) =
        send(&app, "DELETE", &format!("/v1/sessions/{}/history", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["count"], 0);
    assert_eq!(cleared["records"], json!([]));

    // Current result survives a history clear
    let (_, snapshot) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(snapshot["state"], "succeeded");
    assert_eq!(snapshot["currentResult"]["plateNumber"], "京A88888");
    assert_eq!(snapshot["historyLen"], 0);
}

#[tokio::test]
async fn test_start_without_image_is_bad_request() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "invalid_request");

    let (_, snapshot) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(snapshot["state"], "idle");
}

#[tokio::test]
async fn test_analyzer_failure_is_bad_gateway() {
    let app = app_with(Arc::new(StubAnalyzer {
        answer: Err(AnalysisError::Api {
            status: 500,
            message: "internal".to_string(),
        }),
    }));
    let id = create_session(&app).await;
    select_image(&app, &id).await;

    let (status, snapshot) = send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(snapshot["state"], "failed");
    assert_eq!(snapshot["hasImage"], true);
    assert_eq!(snapshot["historyLen"], 0);
    assert!(snapshot["lastError"].is_string());
    assert!(snapshot.get("currentResult").is_none());
}

#[tokio::test]
async fn test_concurrent_start_is_conflict() {
    let gate = Arc::new(GatedAnalyzer {
        release: Notify::new(),
    });
    let app = app_with(gate.clone());
    let id = create_session(&app).await;
    select_image(&app, &id).await;

    let first = {
        let app = app.clone();
        let uri = format!("/v1/sessions/{}/start", id);
        tokio::spawn(async move { send(&app, "POST", &uri, None).await })
    };

    let mut running = false;
    for _ in 0..200 {
        let (_, snapshot) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
        if snapshot["state"] == "running" {
            running = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(running, "first attempt never reached running");

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorType"], "conflict");

    // Image changes are also refused mid-attempt
    let (status, _) = select_image(&app, &id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    gate.release.notify_one();
    let (status, snapshot) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["currentResult"]["plateNumber"], "沪C55555");
    assert_eq!(snapshot["historyLen"], 1);
}

#[tokio::test]
async fn test_dropped_start_request_still_resolves_attempt() {
    let gate = Arc::new(GatedAnalyzer {
        release: Notify::new(),
    });
    let app = app_with(gate.clone());
    let id = create_session(&app).await;
    select_image(&app, &id).await;

    // Client gives up before the service answers
    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        send(&app, "POST", &format!("/v1/sessions/{}/start", id), None),
    )
    .await;
    assert!(abandoned.is_err());

    let (_, snapshot) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(snapshot["state"], "running");

    gate.release.notify_one();

    let mut resolved = None;
    for _ in 0..200 {
        let (_, snapshot) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
        if snapshot["state"] != "running" {
            resolved = Some(snapshot);
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let snapshot = resolved.expect("attempt never resolved after the request was dropped");
    assert_eq!(snapshot["state"], "succeeded");
    assert_eq!(snapshot["currentResult"]["plateNumber"], "沪C55555");
    assert_eq!(snapshot["historyLen"], 1);

    // The session accepts commands again
    let (status, _) = select_image(&app, &id).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/v1/sessions/{}/image", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_multi_megabyte_image_accepted() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(3 * 1024 * 1024, 0);
    let data_url = ImagePayload::from_bytes(bytes).unwrap().to_data_url();

    let (status, snapshot) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/image", id),
        Some(json!({ "image": data_url })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["hasImage"], true);
}

#[tokio::test]
async fn test_image_over_size_cap_is_validation_error() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let oversized = "A".repeat(MAX_ENCODED_IMAGE_SIZE + 1);
    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/image", id),
        Some(json!({ "image": oversized })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "validation_error");
    assert_eq!(body["details"]["field"], "image");
}

#[tokio::test]
async fn test_remove_image_returns_to_idle() {
    let app = succeeding_app();
    let id = create_session(&app).await;
    select_image(&app, &id).await;
    send(&app, "POST", &format!("/v1/sessions/{}/start", id), None).await;

    let (status, snapshot) = send(&app, "DELETE", &format!("/v1/sessions/{}/image", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["hasImage"], false);
    assert!(snapshot.get("currentResult").is_none());
    assert_eq!(snapshot["historyLen"], 1);
}

#[tokio::test]
async fn test_invalid_image_rejected() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/image", id),
        Some(json!({ "image": "data:image/png;base64,!!!not-base64!!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "validation_error");
    assert_eq!(body["details"]["field"], "image");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/image", id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let app = succeeding_app();
    let missing = uuid::Uuid::new_v4();

    for (method, path) in [
        ("GET", format!("/v1/sessions/{}", missing)),
        ("POST", format!("/v1/sessions/{}/start", missing)),
        ("GET", format!("/v1/sessions/{}/history", missing)),
        ("DELETE", format!("/v1/sessions/{}", missing)),
    ] {
        let (status, body) = send(&app, method, &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
        assert_eq!(body["errorType"], "not_found");
    }
}

#[tokio::test]
async fn test_delete_session() {
    let app = succeeding_app();
    let id = create_session(&app).await;

    let (status, _) = send(&app, "DELETE", &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let app = succeeding_app();
    create_session(&app).await;
    create_session(&app).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["analyzer"], "stub");
    assert_eq!(body["activeSessions"], 2);
}
