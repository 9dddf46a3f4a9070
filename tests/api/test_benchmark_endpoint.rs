// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fog_lpr_workbench::{
    api::{create_app, AppState},
    recognition::{AnalysisError, PlateAnalyzer, RecognitionOutcome},
    vision::ImagePayload,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

struct NoopAnalyzer;

#[async_trait]
impl PlateAnalyzer for NoopAnalyzer {
    async fn analyze(&self, _image: &ImagePayload) -> Result<RecognitionOutcome, AnalysisError> {
        Err(AnalysisError::MissingCredential)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

async fn get_benchmark() -> (StatusCode, Value) {
    let app = create_app(Arc::new(AppState::new(Arc::new(NoopAnalyzer))));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/benchmark")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_benchmark_table_shape() {
    let (status, body) = get_benchmark().await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["rows"].as_array().unwrap();
    let fogs: Vec<&str> = rows.iter().map(|r| r["fog"].as_str().unwrap()).collect();
    assert_eq!(fogs, vec!["none", "light", "moderate", "heavy"]);

    for row in rows {
        let variants: Vec<&str> = row["measurements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["variant"].as_str().unwrap())
            .collect();
        assert_eq!(
            variants,
            vec!["direct", "histogramEqualization", "darkChannelPrior"]
        );
    }
}

#[tokio::test]
async fn test_benchmark_heavy_fog_figures() {
    let (_, body) = get_benchmark().await;
    let heavy = &body["rows"][3];
    assert_eq!(heavy["fogLabel"], "重度");
    assert_eq!(heavy["measurements"][0]["accuracy"], 0.15);
    assert_eq!(heavy["measurements"][1]["accuracy"], 0.38);
    assert_eq!(heavy["measurements"][2]["accuracy"], 0.86);
}

#[tokio::test]
async fn test_benchmark_has_no_session_side_effects() {
    let state = Arc::new(AppState::new(Arc::new(NoopAnalyzer)));
    let app = create_app(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/benchmark")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.sessions.is_empty().await);
}
