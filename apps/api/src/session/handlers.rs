use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::watcher::{IdleCommand, IdleStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub user_id: String,
    pub status: IdleStatus,
}

/// POST /api/v1/sessions
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("userId must not be empty".into()));
    }
    let (subject, status) = state
        .sessions
        .start(user_id.to_string(), state.config.idle, state.terminator.clone())
        .await;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: subject.session_id,
            user_id: subject.user_id,
            status,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdleStatus>, AppError> {
    Ok(Json(state.sessions.send(id, IdleCommand::Status).await?))
}

/// POST /api/v1/sessions/:id/activity
pub async fn handle_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdleStatus>, AppError> {
    Ok(Json(state.sessions.send(id, IdleCommand::Activity).await?))
}

/// POST /api/v1/sessions/:id/visibility
pub async fn handle_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VisibilityRequest>,
) -> Result<Json<IdleStatus>, AppError> {
    let command = IdleCommand::Visibility {
        visible: req.visible,
    };
    Ok(Json(state.sessions.send(id, command).await?))
}

/// POST /api/v1/sessions/:id/confirm
pub async fn handle_confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdleStatus>, AppError> {
    Ok(Json(state.sessions.send(id, IdleCommand::Confirm).await?))
}

/// POST /api/v1/sessions/:id/decline
pub async fn handle_decline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdleStatus>, AppError> {
    Ok(Json(state.sessions.send(id, IdleCommand::Decline).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
