// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod session;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use http_server::{create_app, start_server, ApiConfig, AppState};
pub use session::{CreateSessionResponse, HistoryResponse, SelectImageRequest};
