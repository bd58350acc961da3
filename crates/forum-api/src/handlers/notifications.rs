//! Notification handlers

use axum::{extract::State, Json};
use forum_service::dto::{MessageResponse, NotificationListResponse};
use forum_service::NotificationService;

use crate::extractors::{AuthUser, NotificationIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Newest first, with the unread count
///
/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<NotificationListResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.list(auth.user_id()).await?))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.mark_all_read(auth.user_id()).await?))
}

/// POST /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    path: NotificationIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(
        service
            .mark_read(auth.user_id(), path.notification_id()?)
            .await?,
    ))
}

/// DELETE /notifications/{notification_id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    path: NotificationIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(
        service
            .delete(auth.user_id(), path.notification_id()?)
            .await?,
    ))
}
