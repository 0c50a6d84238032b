//! Review handlers

use axum::{extract::State, Json};
use squad_core::Id;
use squad_service::dto::{CreateReviewRequest, ProfileReviewsResponse, ReviewResponse, ReviewsQuery};
use squad_service::ReviewService;

use crate::extractors::{AuthUser, PathParams, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Review the pro of a completed order
///
/// POST /orders/{order_id}/review
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(order_id): PathParams<Id>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<Created<Json<ReviewResponse>>> {
    let service = ReviewService::new(state.service_context());
    let review = service.create(auth.user_id, order_id, request).await?;
    Ok(Created(Json(review)))
}

/// GET /profiles/{profile_id}/reviews
pub async fn list_profile_reviews(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParams(profile_id): PathParams<Id>,
) -> ApiResult<Json<ProfileReviewsResponse>> {
    let service = ReviewService::new(state.service_context());
    Ok(Json(service.list_for_profile(profile_id).await?))
}

/// GET /admin/reviews
pub async fn list_all_reviews(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ReviewsQuery>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let service = ReviewService::new(state.service_context());
    Ok(Json(service.list_all(auth.user_id, &query).await?))
}

/// DELETE /admin/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(review_id): PathParams<Id>,
) -> ApiResult<NoContent> {
    let service = ReviewService::new(state.service_context());
    service.delete(auth.user_id, review_id).await?;
    Ok(NoContent)
}
