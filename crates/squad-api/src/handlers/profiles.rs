//! Profile handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use squad_core::Id;
use squad_service::dto::{
    GameProfileResponse, ProfileResponse, ReviewApplicationRequest, UpdateGameProfileRequest,
    UpsertProfileRequest,
};
use squad_service::{GameProfileService, ProfileService};

use crate::extractors::{AuthUser, PathParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get the caller's profile
///
/// GET /profiles/@me
pub async fn get_current_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    let profile = service.get_current(auth.user_id).await?;
    Ok(Json(profile))
}

/// Complete sign-up or edit the caller's profile.
/// 201 when the profile was created, 200 otherwise.
///
/// PUT /profiles/@me
pub async fn upsert_current_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpsertProfileRequest>,
) -> ApiResult<Response> {
    let service = ProfileService::new(state.service_context());
    let (profile, created) = service.upsert_current(auth.user_id, request).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(profile)).into_response())
}

/// Get any profile
///
/// GET /profiles/{profile_id}
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParams(profile_id): PathParams<Id>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    Ok(Json(service.get(profile_id).await?))
}

/// Ranks and hours per game
///
/// GET /profiles/{profile_id}/games
pub async fn list_game_profiles(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParams(profile_id): PathParams<Id>,
) -> ApiResult<Json<Vec<GameProfileResponse>>> {
    let service = GameProfileService::new(state.service_context());
    Ok(Json(service.list(profile_id).await?))
}

/// PUT /profiles/@me/games/{slug}
pub async fn update_my_game_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(slug): PathParams<String>,
    ValidatedJson(request): ValidatedJson<UpdateGameProfileRequest>,
) -> ApiResult<Json<GameProfileResponse>> {
    let service = GameProfileService::new(state.service_context());
    let game_profile = service.update_mine(auth.user_id, &slug, request).await?;
    Ok(Json(game_profile))
}

/// Approve or reject a pro application
///
/// POST /admin/profiles/{profile_id}/application
pub async fn review_application(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(profile_id): PathParams<Id>,
    ValidatedJson(request): ValidatedJson<ReviewApplicationRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    let profile = service
        .review_application(auth.user_id, profile_id, request)
        .await?;
    Ok(Json(profile))
}
