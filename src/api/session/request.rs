// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::{ImagePayload, MAX_IMAGE_SIZE};

/// Base64 inflates payloads by 4/3, plus room for a data-URL header
pub const MAX_ENCODED_IMAGE_SIZE: usize = MAX_IMAGE_SIZE / 3 * 4 + 256;

/// Request to bind an image to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectImageRequest {
    /// Data URL (`data:image/jpeg;base64,...`) or bare base64 image data
    #[serde(default)]
    pub image: Option<String>,
}

impl SelectImageRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), ApiError> {
        let image = self.image.as_deref().unwrap_or_default();
        if image.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "image".to_string(),
                message: "image is required".to_string(),
            });
        }

        if image.len() > MAX_ENCODED_IMAGE_SIZE {
            return Err(ApiError::ValidationError {
                field: "image".to_string(),
                message: format!(
                    "image exceeds maximum size of {} bytes",
                    MAX_ENCODED_IMAGE_SIZE
                ),
            });
        }

        Ok(())
    }

    /// Validate and decode into a payload
    pub fn into_payload(self) -> Result<ImagePayload, ApiError> {
        self.validate()?;
        let image = self.image.unwrap_or_default();
        Ok(ImagePayload::from_data_url(&image)?)
    }
}
