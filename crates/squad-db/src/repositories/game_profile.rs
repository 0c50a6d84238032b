//! PostgreSQL implementation of GameProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use squad_core::entities::GameProfile;
use squad_core::traits::{GameProfileRepository, RepoResult};
use squad_core::value_objects::Id;

use crate::models::GameProfileModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgGameProfileRepository {
    pool: PgPool,
}

impl PgGameProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameProfileRepository for PgGameProfileRepository {
    #[instrument(skip(self))]
    async fn find(&self, profile_id: Id, game_id: Id) -> RepoResult<Option<GameProfile>> {
        let result = sqlx::query_as::<_, GameProfileModel>(
            r"
            SELECT profile_id, game_id, rank, hours_played, updated_at
            FROM game_profiles
            WHERE profile_id = $1 AND game_id = $2
            ",
        )
        .bind(profile_id.into_inner())
        .bind(game_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GameProfile::from))
    }

    #[instrument(skip(self))]
    async fn list_for_profile(&self, profile_id: Id) -> RepoResult<Vec<GameProfile>> {
        let rows = sqlx::query_as::<_, GameProfileModel>(
            r"
            SELECT gp.profile_id, gp.game_id, gp.rank, gp.hours_played, gp.updated_at
            FROM game_profiles gp
            JOIN games g ON g.id = gp.game_id
            WHERE gp.profile_id = $1
            ORDER BY g.name
            ",
        )
        .bind(profile_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(GameProfile::from).collect())
    }

    #[instrument(skip(self, game_profile), fields(profile_id = %game_profile.profile_id))]
    async fn upsert(&self, game_profile: &GameProfile) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO game_profiles (profile_id, game_id, rank, hours_played, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (profile_id, game_id) DO UPDATE
            SET rank = EXCLUDED.rank,
                hours_played = EXCLUDED.hours_played,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(game_profile.profile_id.into_inner())
        .bind(game_profile.game_id.into_inner())
        .bind(&game_profile.rank)
        .bind(game_profile.hours_played)
        .bind(game_profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
