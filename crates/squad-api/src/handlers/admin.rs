//! Staff-only handlers. Role checks happen in the services.

use axum::{extract::State, Json};
use squad_core::Id;
use squad_service::dto::{
    AdminOrdersQuery, AdminOrdersResponse, ArchiveResponse, OrderResponse,
    UpdateOrderStatusRequest,
};
use squad_service::{AdminService, OrderService};

use crate::extractors::{AuthUser, PathParams, QueryParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// All orders with per-status totals
///
/// GET /admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<AdminOrdersQuery>,
) -> ApiResult<Json<AdminOrdersResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.order_overview(auth.user_id, &query).await?))
}

/// Override an order's status
///
/// PATCH /admin/orders/{order_id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
    ValidatedJson(request): ValidatedJson<UpdateOrderStatusRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let service = OrderService::new(state.service_context());
    let order = service
        .revert_status(order_id, auth.user_id, request)
        .await?;
    Ok(Json(order))
}

/// Archive old messages in closed rooms
///
/// POST /admin/chat/archive
pub async fn archive_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ArchiveResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.archive_messages(auth.user_id).await?))
}
