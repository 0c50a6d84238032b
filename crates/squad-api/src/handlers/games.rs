//! Game catalog handlers

use axum::{extract::State, Json};
use squad_service::dto::GameResponse;
use squad_service::GameService;

use crate::extractors::PathParams;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /games
pub async fn list_games(State(state): State<AppState>) -> ApiResult<Json<Vec<GameResponse>>> {
    let service = GameService::new(state.service_context());
    Ok(Json(service.list().await?))
}

/// GET /games/{slug}
pub async fn get_game(
    State(state): State<AppState>,
    PathParams(slug): PathParams<String>,
) -> ApiResult<Json<GameResponse>> {
    let service = GameService::new(state.service_context());
    Ok(Json(service.get_by_slug(&slug).await?))
}
