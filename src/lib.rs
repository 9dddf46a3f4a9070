// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod benchmark;
pub mod recognition;
pub mod session;
pub mod version;
pub mod vision;

// Re-export main types
pub use benchmark::{AlgorithmVariant, BenchmarkDataset, FogSeverity};
pub use recognition::{AnalysisError, GeminiClient, PlateAnalyzer, RecognitionConfig, RecognitionOutcome};
pub use session::{
    HistoryLedger, RecognitionSession, ResultRecord, SessionError, SessionRegistry, SessionState,
};
pub use vision::{ImageError, ImagePayload, ImageRef};
