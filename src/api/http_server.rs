// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{benchmark_handler, health_handler};
use super::session::{
    clear_history_handler, create_session_handler, delete_session_handler, get_session_handler,
    history_handler, remove_image_handler, select_image_handler, start_handler,
    MAX_ENCODED_IMAGE_SIZE,
};
use crate::benchmark::BenchmarkDataset;
use crate::recognition::PlateAnalyzer;
use crate::session::SessionRegistry;

/// Room for the JSON envelope around an image at the encoded size cap
const REQUEST_BODY_LIMIT: usize = MAX_ENCODED_IMAGE_SIZE + 1024;

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

pub struct AppState {
    pub sessions: SessionRegistry,
    pub analyzer: Arc<dyn PlateAnalyzer>,
    pub benchmark: Arc<BenchmarkDataset>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn PlateAnalyzer>) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            analyzer,
            benchmark: Arc::new(BenchmarkDataset::standard()),
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Sessions
        .route("/v1/sessions", post(create_session_handler))
        .route(
            "/v1/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route(
            "/v1/sessions/:id/image",
            post(select_image_handler).delete(remove_image_handler),
        )
        .route("/v1/sessions/:id/start", post(start_handler))
        .route(
            "/v1/sessions/:id/history",
            get(history_handler).delete(clear_history_handler),
        )
        // Benchmark
        .route("/v1/benchmark", get(benchmark_handler))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(config: ApiConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_app(Arc::new(state));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
