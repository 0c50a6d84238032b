//! Notification handlers
//!
//! Every route is scoped to the caller's own notifications.

use axum::{extract::State, Json};
use squad_core::Id;
use squad_service::dto::{CountResponse, MarkReadResponse, NotificationResponse, NotificationsQuery};
use squad_service::NotificationService;

use crate::extractors::{AuthUser, PathParams, QueryParams};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<NotificationsQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.list(auth.user_id, &query).await?))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CountResponse>> {
    let service = NotificationService::new(state.service_context());
    let count = service.unread_count(auth.user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// POST /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(notification_id): PathParams<Id>,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.mark_read(auth.user_id, notification_id).await?;
    Ok(NoContent)
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkReadResponse>> {
    let service = NotificationService::new(state.service_context());
    let updated = service.mark_all_read(auth.user_id).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// DELETE /notifications/{notification_id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(notification_id): PathParams<Id>,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.delete(auth.user_id, notification_id).await?;
    Ok(NoContent)
}
