// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use fog_lpr_workbench::{
    api::{start_server, ApiConfig, AppState},
    recognition::{GeminiClient, RecognitionConfig},
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let recognition_config = RecognitionConfig::from_env();
    recognition_config
        .validate()
        .map_err(|e| anyhow!("Invalid recognition config: {}", e))?;
    if !recognition_config.has_api_key() {
        warn!("GEMINI_API_KEY not set; recognition attempts will fail until it is configured");
    }

    let client = GeminiClient::new(&recognition_config)?;
    let state = AppState::new(Arc::new(client));

    start_server(ApiConfig::from_env(), state).await
}
