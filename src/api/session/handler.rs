// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::request::SelectImageRequest;
use super::response::{CreateSessionResponse, HistoryResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::session::{SessionError, SessionHandle, SessionSnapshot, SessionState};
use crate::vision::ImageRef;

async fn lookup(state: &AppState, id: Uuid) -> Result<SessionHandle, ApiError> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))
}

/// POST /v1/sessions - Create an empty session
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (session_id, handle) = state.sessions.create().await;
    let current = handle.lock().await.state();
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            state: current,
        }),
    )
}

/// GET /v1/sessions/:id - Current state, selected image and result
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, id).await?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /v1/sessions/:id - Drop a session and its history
pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("session {} not found", id)))
    }
}

/// POST /v1/sessions/:id/image - Select an image
///
/// # Request
/// - `image`: data URL or bare base64 image data (required)
///
/// # Errors
/// - 400 Bad Request: missing or undecodable image
/// - 404 Not Found: unknown session
/// - 409 Conflict: an attempt is running
pub async fn select_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectImageRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let payload = request.into_payload().map_err(|e| {
        warn!("Image selection rejected: {}", e);
        e
    })?;
    debug!(
        "Decoded image for session {}: {} bytes ({})",
        id,
        payload.size_bytes(),
        payload.mime_type()
    );

    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    session.select_image(ImageRef::new(payload))?;
    Ok(Json(session.snapshot()))
}

/// DELETE /v1/sessions/:id/image - Remove the selected image
pub async fn remove_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    session.remove_image()?;
    Ok(Json(session.snapshot()))
}

/// POST /v1/sessions/:id/start - Run one recognition attempt
///
/// The session lock is released while the vision service is called, so a
/// concurrent start observes `running` and is rejected. The call and its
/// `finish` run on a spawned task; the attempt resolves even if this request
/// is dropped.
///
/// # Response
/// - 200 OK with the snapshot when the attempt succeeded
/// - 502 Bad Gateway with the snapshot (state `failed`) when the service call failed
///
/// # Errors
/// - 400 Bad Request: no image selected
/// - 404 Not Found: unknown session
/// - 409 Conflict: an attempt is already running
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let handle = lookup(&state, id).await?;

    let attempt = handle.lock().await.begin(Instant::now())?;
    let analyzer = state.analyzer.clone();
    debug!("Session {} analyzing with {}", id, analyzer.name());

    let task = tokio::spawn(async move {
        let result = analyzer.analyze(attempt.image().payload()).await;
        let mut session = handle.lock().await;
        let finished = session.finish(attempt, result, Instant::now())?;
        Ok::<_, SessionError>((finished, session.snapshot()))
    });

    let (finished, snapshot) = task.await.map_err(|e| {
        error!("Recognition task for session {} aborted: {}", id, e);
        ApiError::InternalError("recognition task aborted".to_string())
    })??;

    let status = match finished {
        SessionState::Succeeded => {
            info!("Session {} recognition complete", id);
            StatusCode::OK
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(snapshot)))
}

/// GET /v1/sessions/:id/history - Records newest first
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let handle = lookup(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(HistoryResponse::from_session(&session)))
}

/// DELETE /v1/sessions/:id/history - Clear history, keep the current result
pub async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    session.clear_history();
    Ok(Json(HistoryResponse::from_session(&session)))
}
