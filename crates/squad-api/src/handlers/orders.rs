//! Order handlers
//!
//! Placement, listing and the lifecycle actions on a single order.

use axum::{extract::State, Json};
use squad_core::Id;
use squad_service::dto::{
    AcceptOrderResponse, ChatRoomResponse, CreateOrderRequest, ListOrdersQuery,
    OrderDetailResponse, OrderResponse,
};
use squad_service::{ChatService, OrderService};

use crate::extractors::{AuthUser, PathParams, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Place an order
///
/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<Created<Json<OrderResponse>>> {
    let service = OrderService::new(state.service_context());
    let order = service.create_order(auth.user_id, request).await?;
    Ok(Created(Json(order)))
}

/// The caller's orders, filtered by role
///
/// GET /orders/@me
pub async fn list_my_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListOrdersQuery>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.list_mine(auth.user_id, &query).await?))
}

/// Open quick matches the calling pro can claim
///
/// GET /orders/available
pub async fn list_available_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.list_available(auth.user_id).await?))
}

/// GET /orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<Json<OrderDetailResponse>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.get_detail(auth.user_id, order_id).await?))
}

/// Claim an order and open its chat room
///
/// POST /orders/{order_id}/accept
pub async fn accept_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<Json<AcceptOrderResponse>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.accept(order_id, auth.user_id).await?))
}

/// Hide an order from the caller's available list
///
/// POST /orders/{order_id}/decline
pub async fn decline_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<NoContent> {
    let service = OrderService::new(state.service_context());
    service.decline(order_id, auth.user_id).await?;
    Ok(NoContent)
}

/// POST /orders/{order_id}/complete
pub async fn complete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<Json<OrderResponse>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.complete(order_id, auth.user_id).await?))
}

/// POST /orders/{order_id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<Json<OrderResponse>> {
    let service = OrderService::new(state.service_context());
    Ok(Json(service.cancel(order_id, auth.user_id).await?))
}

/// The order's chat room, `null` before it is accepted
///
/// GET /orders/{order_id}/chat
pub async fn get_order_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
) -> ApiResult<Json<Option<ChatRoomResponse>>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.room_for_order(auth.user_id, order_id).await?))
}
