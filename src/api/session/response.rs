// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session response types

use serde::Serialize;
use uuid::Uuid;

use crate::session::{RecognitionSession, ResultRecord, SessionState};

/// Response for a newly created session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
}

/// History listing with aggregate figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: Uuid,
    /// Newest first
    pub records: Vec<ResultRecord>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_latency_seconds: Option<f64>,
}

impl HistoryResponse {
    pub fn from_session(session: &RecognitionSession) -> Self {
        let history = session.history();
        Self {
            session_id: session.id(),
            records: history.list(),
            count: history.len(),
            average_confidence: history.average_confidence(),
            average_latency_seconds: history.average_latency_seconds(),
        }
    }
}
