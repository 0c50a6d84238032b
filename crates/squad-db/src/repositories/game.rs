//! PostgreSQL implementation of GameRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use squad_core::entities::Game;
use squad_core::error::DomainError;
use squad_core::traits::{GameRepository, RepoResult};
use squad_core::value_objects::Id;

use crate::models::GameModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of GameRepository
#[derive(Clone)]
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Game>> {
        let result = sqlx::query_as::<_, GameModel>(
            r"
            SELECT id, name, slug, description, image_url, created_at
            FROM games
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Game::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Game>> {
        let result = sqlx::query_as::<_, GameModel>(
            r"
            SELECT id, name, slug, description, image_url, created_at
            FROM games
            WHERE LOWER(name) = LOWER($1)
            ",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Game::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>> {
        let result = sqlx::query_as::<_, GameModel>(
            r"
            SELECT id, name, slug, description, image_url, created_at
            FROM games
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Game::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameModel>(
            r"
            SELECT id, name, slug, description, image_url, created_at
            FROM games
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    #[instrument(skip(self, game), fields(game = %game.name))]
    async fn create(&self, game: &Game) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO games (id, name, slug, description, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(game.id.into_inner())
        .bind(&game.name)
        .bind(&game.slug)
        .bind(&game.description)
        .bind(&game.image_url)
        .bind(game.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("game '{}' already exists", game.name))
            })
        })?;

        Ok(())
    }
}
