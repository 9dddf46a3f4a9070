// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! License plate recognition through an external vision service
//!
//! Dehazing and character recognition both happen inside the service. This
//! module only:
//! - sends one image per call with a fixed instruction prompt
//! - parses the answer against a strict schema
//! - reports transport, timeout and schema failures as [`AnalysisError`]

pub mod analyzer;
pub mod config;
pub mod gemini;
pub mod types;

pub use analyzer::PlateAnalyzer;
pub use config::RecognitionConfig;
pub use gemini::GeminiClient;
pub use types::{AnalysisError, RecognitionOutcome};
