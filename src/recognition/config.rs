// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the plate recognition client

use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the vision service client
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Service API key; checked on first call, not at startup
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Base URL of the service
    pub endpoint: String,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl RecognitionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            endpoint: env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            request_timeout_ms: env::var("RECOGNITION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // A missing API key is allowed here and reported on first use
        if self.model.trim().is_empty() {
            return Err("Model name must not be empty".to_string());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("Endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
