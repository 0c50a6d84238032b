//! Chat room handlers

use axum::{extract::State, Json};
use squad_core::Id;
use squad_service::dto::{
    ChatMessageResponse, ChatRoomResponse, CountResponse, MarkReadResponse, MessagePageResponse,
    MessagesQuery, SendMessageRequest,
};
use squad_service::ChatService;

use crate::extractors::{AuthUser, PathParams, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Rooms the caller takes part in
///
/// GET /chat
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ChatRoomResponse>>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.list_rooms(auth.user_id).await?))
}

/// One page of history, newest first
///
/// GET /chat/{room_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(room_id): PathParams<Id>,
    QueryParams(query): QueryParams<MessagesQuery>,
) -> ApiResult<Json<MessagePageResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.list_messages(auth.user_id, room_id, &query).await?))
}

/// GET /chat/{room_id}/messages/count
pub async fn count_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(room_id): PathParams<Id>,
    QueryParams(query): QueryParams<MessagesQuery>,
) -> ApiResult<Json<CountResponse>> {
    let service = ChatService::new(state.service_context());
    let count = service
        .count_messages(auth.user_id, room_id, query.include_archived)
        .await?;
    Ok(Json(CountResponse { count }))
}

/// POST /chat/{room_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(room_id): PathParams<Id>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<ChatMessageResponse>>> {
    let service = ChatService::new(state.service_context());
    let message = service.send_message(auth.user_id, room_id, request).await?;
    Ok(Created(Json(message)))
}

/// Mark the other participant's messages as read
///
/// POST /chat/{room_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(room_id): PathParams<Id>,
) -> ApiResult<Json<MarkReadResponse>> {
    let service = ChatService::new(state.service_context());
    let updated = service.mark_read(auth.user_id, room_id).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// POST /chat/{room_id}/close
pub async fn close_room(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(room_id): PathParams<Id>,
) -> ApiResult<Json<ChatRoomResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.close_room(auth.user_id, room_id).await?))
}
