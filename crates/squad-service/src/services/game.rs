//! Game catalog service

use squad_core::{DomainError, Game, Id};
use tracing::{info, instrument};

use crate::dto::GameResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Game catalog service
pub struct GameService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GameService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<GameResponse>> {
        let games = self.ctx.game_repo().list().await?;
        Ok(games.into_iter().map(GameResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<GameResponse> {
        let game = self
            .ctx
            .game_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GameNotFound(slug.to_string()))?;
        Ok(GameResponse::from(game))
    }

    /// Find a game by case-insensitive name, creating it when unknown
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> ServiceResult<Game> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("game is required"));
        }

        let repo = self.ctx.game_repo();
        if let Some(game) = repo.find_by_name(name).await? {
            return Ok(game);
        }

        let game = Game::new(Id::new(), name.to_string());
        if game.slug.is_empty() {
            return Err(ServiceError::validation(format!("'{name}' is not a usable game name")));
        }

        match repo.create(&game).await {
            Ok(()) => {
                info!(game_id = %game.id, slug = %game.slug, "Game added to catalog");
                Ok(game)
            }
            // Lost a race with another order naming the same game
            Err(e) => match repo.find_by_name(name).await? {
                Some(existing) => Ok(existing),
                None => match repo.find_by_slug(&game.slug).await? {
                    Some(existing) => Ok(existing),
                    None => Err(e.into()),
                },
            },
        }
    }
}
