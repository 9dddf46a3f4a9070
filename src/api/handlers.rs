// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_server::AppState;
use crate::benchmark::BenchmarkDataset;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analyzer: String,
    pub active_sessions: usize,
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        analyzer: state.analyzer.name().to_string(),
        active_sessions: state.sessions.len().await,
    })
}

/// GET /v1/benchmark - Static accuracy comparison across fog severities
pub async fn benchmark_handler(State(state): State<Arc<AppState>>) -> Json<BenchmarkDataset> {
    Json(state.benchmark.as_ref().clone())
}
