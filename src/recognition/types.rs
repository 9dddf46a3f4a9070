// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for plate recognition

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw answer from a vision service, before any defaulting
///
/// Every field may be absent; the session turns this into a
/// [`ResultRecord`](crate::session::ResultRecord) with defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOutcome {
    /// Plate text, e.g. "京A88888"
    #[serde(default)]
    pub plate_number: Option<String>,
    /// Vehicle or plate color
    #[serde(default)]
    pub color: Option<String>,
    /// Confidence score, nominally 0.0-1.0
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Free-text explanation from the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl RecognitionOutcome {
    pub fn new(plate_number: &str, color: &str, confidence: f64) -> Self {
        Self {
            plate_number: Some(plate_number.to_string()),
            color: Some(color.to_string()),
            confidence: Some(confidence),
            summary: None,
        }
    }
}

/// Errors from a single analysis call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// No API key configured for the vision service
    #[error("No API key configured for the vision service")]
    MissingCredential,

    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out
    #[error("Analysis timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Non-success status from the vision service
    #[error("Vision API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Response did not match the expected schema
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalysisError {
    /// Short machine-readable tag, used in logs and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredential => "missing_credential",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Timeout { .. } => "timeout",
            AnalysisError::Api { .. } => "api",
            AnalysisError::InvalidResponse(_) => "invalid_response",
        }
    }
}
