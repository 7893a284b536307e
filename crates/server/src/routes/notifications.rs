//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bluedrop_core::NotificationId;

use crate::db::notifications::NotificationRepository;
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Default number of notifications returned.
const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for the notification list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// List the newest notifications.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);
    let notifications = NotificationRepository::new(state.pool())
        .list(user.business_id, limit)
        .await?;
    Ok(Json(notifications))
}

/// Unread notification count (the badge number).
pub async fn unread_count(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, AppError> {
    let count = NotificationRepository::new(state.pool())
        .unread_count(user.business_id)
        .await?;
    Ok(Json(json!({ "unread": count })))
}

/// Mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<NotificationId>,
) -> Result<impl IntoResponse, AppError> {
    let changed = NotificationRepository::new(state.pool())
        .mark_read(user.business_id, id)
        .await?;
    if !changed {
        return Err(AppError::NotFound(format!("notification {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one notification.
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<NotificationId>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = NotificationRepository::new(state.pool())
        .delete(user.business_id, id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("notification {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the whole notification log.
pub async fn clear_all(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, AppError> {
    let removed = NotificationRepository::new(state.pool())
        .clear_all(user.business_id)
        .await?;
    Ok(Json(json!({ "removed": removed })))
}
