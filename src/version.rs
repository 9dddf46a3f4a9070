// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the FogLPR workbench

/// Full version string with feature description
pub const VERSION: &str = "v2.1.0-fog-lpr-2025-11-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "2.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "gemini-recognition",
    "strict-schema-parsing",
    "session-state-machine",
    "session-history",
    "fog-benchmark",
    "request-timeout",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("FogLPR Workbench {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
