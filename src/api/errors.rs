// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::session::SessionError;
use crate::vision::ImageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    Conflict(String),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error on {}: {}", field, message)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoImageSelected => ApiError::InvalidRequest(err.to_string()),
            SessionError::AlreadyRunning
            | SessionError::NotRunning
            | SessionError::StaleAttempt => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::ValidationError {
            field: "image".to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
