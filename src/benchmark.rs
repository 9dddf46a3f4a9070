// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static accuracy comparison across fog severities
//!
//! These figures are reference data for display. They are not derived from
//! live recognition results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fog severity buckets, ordered from clear to heavy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FogSeverity {
    None,
    Light,
    Moderate,
    Heavy,
}

impl FogSeverity {
    pub const ALL: [FogSeverity; 4] = [
        FogSeverity::None,
        FogSeverity::Light,
        FogSeverity::Moderate,
        FogSeverity::Heavy,
    ];

    /// Display label used by the workbench UI
    pub fn label(&self) -> &'static str {
        match self {
            FogSeverity::None => "无雾",
            FogSeverity::Light => "轻度",
            FogSeverity::Moderate => "中度",
            FogSeverity::Heavy => "重度",
        }
    }
}

/// Recognition strategies compared in the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmVariant {
    /// Recognition on the raw foggy image
    Direct,
    /// Contrast boost by histogram equalization before recognition
    HistogramEqualization,
    /// Dark channel prior dehazing before recognition
    DarkChannelPrior,
}

impl AlgorithmVariant {
    pub const ALL: [AlgorithmVariant; 3] = [
        AlgorithmVariant::Direct,
        AlgorithmVariant::HistogramEqualization,
        AlgorithmVariant::DarkChannelPrior,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AlgorithmVariant::Direct => "Direct Recognition",
            AlgorithmVariant::HistogramEqualization => "Histogram Equalization",
            AlgorithmVariant::DarkChannelPrior => "Dark Channel Prior (Proposed)",
        }
    }

    /// Short tag used as a chart series key
    pub fn short_name(&self) -> &'static str {
        match self {
            AlgorithmVariant::Direct => "Direct",
            AlgorithmVariant::HistogramEqualization => "HE",
            AlgorithmVariant::DarkChannelPrior => "DCP",
        }
    }
}

impl fmt::Display for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One variant's figures for one fog bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMeasurement {
    pub variant: AlgorithmVariant,
    /// Fraction of plates read correctly, 0.0-1.0
    pub accuracy: f64,
    /// Mean processing latency, when measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

/// All variants' figures for one fog bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRow {
    pub fog: FogSeverity,
    pub fog_label: String,
    pub measurements: Vec<VariantMeasurement>,
}

impl BenchmarkRow {
    fn new(fog: FogSeverity, direct: f64, he: f64, dcp: f64) -> Self {
        let measurement = |variant, accuracy| VariantMeasurement {
            variant,
            accuracy,
            latency_ms: None,
        };
        Self {
            fog,
            fog_label: fog.label().to_string(),
            measurements: vec![
                measurement(AlgorithmVariant::Direct, direct),
                measurement(AlgorithmVariant::HistogramEqualization, he),
                measurement(AlgorithmVariant::DarkChannelPrior, dcp),
            ],
        }
    }

    pub fn measurement(&self, variant: AlgorithmVariant) -> Option<&VariantMeasurement> {
        self.measurements.iter().find(|m| m.variant == variant)
    }
}

/// Read-only comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDataset {
    rows: Vec<BenchmarkRow>,
}

impl BenchmarkDataset {
    /// The reference table shown on the benchmark page
    pub fn standard() -> Self {
        Self {
            rows: vec![
                BenchmarkRow::new(FogSeverity::None, 0.98, 0.95, 0.97),
                BenchmarkRow::new(FogSeverity::Light, 0.72, 0.81, 0.94),
                BenchmarkRow::new(FogSeverity::Moderate, 0.45, 0.62, 0.91),
                BenchmarkRow::new(FogSeverity::Heavy, 0.15, 0.38, 0.86),
            ],
        }
    }

    /// Rows ordered from clear to heavy fog
    pub fn rows(&self) -> &[BenchmarkRow] {
        &self.rows
    }

    pub fn row(&self, fog: FogSeverity) -> Option<&BenchmarkRow> {
        self.rows.iter().find(|r| r.fog == fog)
    }

    pub fn accuracy(&self, fog: FogSeverity, variant: AlgorithmVariant) -> Option<f64> {
        self.row(fog)?.measurement(variant).map(|m| m.accuracy)
    }

    pub fn latency_ms(&self, fog: FogSeverity, variant: AlgorithmVariant) -> Option<f64> {
        self.row(fog)?.measurement(variant)?.latency_ms
    }

    /// Accuracy of one variant across all fog buckets, in row order
    pub fn accuracy_series(&self, variant: AlgorithmVariant) -> Vec<(FogSeverity, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.measurement(variant).map(|m| (r.fog, m.accuracy)))
            .collect()
    }

    /// Variant with the highest accuracy in a fog bucket
    pub fn best_variant(&self, fog: FogSeverity) -> Option<AlgorithmVariant> {
        self.row(fog)?
            .measurements
            .iter()
            .max_by(|a, b| a.accuracy.total_cmp(&b.accuracy))
            .map(|m| m.variant)
    }
}

impl Default for BenchmarkDataset {
    fn default() -> Self {
        Self::standard()
    }
}
