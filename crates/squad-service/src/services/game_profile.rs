//! Per-game stats shown on a profile

use squad_core::{DomainError, GameProfile, Id};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{GameProfileResponse, GameResponse, UpdateGameProfileRequest};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct GameProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GameProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A profile's games, skipping rows whose game has left the catalog
    #[instrument(skip(self))]
    pub async fn list(&self, profile_id: Id) -> ServiceResult<Vec<GameProfileResponse>> {
        self.ctx
            .profile_repo()
            .find_by_id(profile_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile_id))?;

        let rows = self.ctx.game_profile_repo().list_for_profile(profile_id).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(game) = self.ctx.game_repo().find_by_id(row.game_id).await? {
                out.push(response(row, game.into()));
            }
        }
        Ok(out)
    }

    /// Set the caller's rank and hours for the game with `slug`
    #[instrument(skip(self, request))]
    pub async fn update_mine(
        &self,
        user_id: Id,
        slug: &str,
        request: UpdateGameProfileRequest,
    ) -> ServiceResult<GameProfileResponse> {
        request.validate()?;
        AccessService::new(self.ctx).profile(user_id).await?;

        let game = self
            .ctx
            .game_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GameNotFound(slug.to_string()))?;

        let repo = self.ctx.game_profile_repo();
        let mut row = repo
            .find(user_id, game.id)
            .await?
            .unwrap_or_else(|| GameProfile::new(user_id, game.id));
        row.update(request.rank, request.hours_played)?;
        repo.upsert(&row).await?;

        info!(user_id = %user_id, game = %game.slug, "Game profile updated");
        Ok(response(row, game.into()))
    }
}

fn response(row: GameProfile, game: GameResponse) -> GameProfileResponse {
    GameProfileResponse {
        game,
        rank: row.rank,
        hours_played: row.hours_played,
        updated_at: row.updated_at,
    }
}
