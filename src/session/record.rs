// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Completed recognition records and the defaulting rules that build them

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

use crate::benchmark::AlgorithmVariant;
use crate::recognition::RecognitionOutcome;
use crate::vision::ImageRef;

/// Plate text recorded when the service returns none
pub const UNKNOWN_PLATE: &str = "未知";

/// Color recorded when the service returns none
pub const UNKNOWN_COLOR: &str = "不详";

/// Strategy every record is attributed to
pub const RECORD_ALGORITHM: AlgorithmVariant = AlgorithmVariant::DarkChannelPrior;

/// Outcome of one completed recognition attempt
///
/// Fields are private; a record never changes after [`build_record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    plate_number: String,
    color: String,
    confidence: f64,
    latency_seconds: f64,
    algorithm: AlgorithmVariant,
    source_image: ImageRef,
    captured_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

impl ResultRecord {
    pub fn plate_number(&self) -> &str {
        &self.plate_number
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn latency_seconds(&self) -> f64 {
        self.latency_seconds
    }

    pub fn algorithm(&self) -> AlgorithmVariant {
        self.algorithm
    }

    pub fn source_image(&self) -> &ImageRef {
        &self.source_image
    }

    pub fn captured_at(&self) -> &str {
        &self.captured_at
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// Round a measured latency to whole milliseconds (half-up) and express it in seconds
pub fn round_latency(elapsed: Duration) -> f64 {
    let millis = (elapsed.as_nanos() + 500_000) / 1_000_000;
    millis as f64 / 1000.0
}

fn text_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback.to_string(),
    }
}

fn confidence_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(c) if c.is_finite() => {
            // Passed through unclamped; see DESIGN.md
            if !(0.0..=1.0).contains(&c) {
                warn!(confidence = c, "confidence outside [0, 1] kept as reported");
            }
            c
        }
        _ => 0.0,
    }
}

/// Build a record from a service outcome, filling in defaults field by field
///
/// - blank or missing plate → [`UNKNOWN_PLATE`]
/// - blank or missing color → [`UNKNOWN_COLOR`]
/// - missing or non-finite confidence → 0
pub fn build_record(
    outcome: RecognitionOutcome,
    latency_seconds: f64,
    image: ImageRef,
    now: DateTime<Local>,
) -> ResultRecord {
    ResultRecord {
        plate_number: text_or(outcome.plate_number, UNKNOWN_PLATE),
        color: text_or(outcome.color, UNKNOWN_COLOR),
        confidence: confidence_or_zero(outcome.confidence),
        latency_seconds: latency_seconds.max(0.0),
        algorithm: RECORD_ALGORITHM,
        source_image: image,
        captured_at: now.format("%H:%M:%S").to_string(),
        summary: outcome.summary.filter(|s| !s.trim().is_empty()),
    }
}
