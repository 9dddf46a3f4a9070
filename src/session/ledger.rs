// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Newest-first history of recognition records

use std::collections::VecDeque;

use super::record::ResultRecord;

/// Session-scoped history of completed recognitions
///
/// Unbounded and not persisted; duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    records: VecDeque<ResultRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the front
    pub fn append(&mut self, record: ResultRecord) {
        self.records.push_front(record);
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Owned copy of all records, newest first
    pub fn list(&self) -> Vec<ResultRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&ResultRecord> {
        self.records.front()
    }

    pub fn average_confidence(&self) -> Option<f64> {
        self.mean(ResultRecord::confidence)
    }

    pub fn average_latency_seconds(&self) -> Option<f64> {
        self.mean(ResultRecord::latency_seconds)
    }

    fn mean(&self, field: fn(&ResultRecord) -> f64) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self.records.iter().map(field).sum();
        Some(total / self.records.len() as f64)
    }
}
