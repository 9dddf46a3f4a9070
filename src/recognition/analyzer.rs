// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plate analyzer trait definition

use async_trait::async_trait;

use super::types::{AnalysisError, RecognitionOutcome};
use crate::vision::ImagePayload;

/// Trait for services that read a license plate from an image
///
/// Implementations make exactly one attempt per call and keep no state
/// between calls, so one instance may be shared or recreated freely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlateAnalyzer: Send + Sync {
    /// Analyze one image
    ///
    /// # Returns
    /// The parsed outcome, or an error if the call failed or the response
    /// could not be parsed
    async fn analyze(&self, image: &ImagePayload) -> Result<RecognitionOutcome, AnalysisError>;

    /// Analyzer name for logging
    fn name(&self) -> &'static str;
}
