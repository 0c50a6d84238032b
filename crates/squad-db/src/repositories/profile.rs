//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use squad_core::entities::{AccountType, Profile};
use squad_core::error::DomainError;
use squad_core::traits::{ProfileRepository, RepoResult};
use squad_core::value_objects::Id;

use crate::models::ProfileModel;

use super::error::{convert_rows, map_db_error, map_unique_violation};

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(
            r"
            SELECT id, username, account_type, application_status, is_verified,
                   avatar_url, bio, location, created_at, updated_at
            FROM profiles
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Profile::try_from).transpose()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Id]) -> RepoResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, ProfileModel>(
            r"
            SELECT id, username, account_type, application_status, is_verified,
                   avatar_url, bio, location, created_at, updated_at
            FROM profiles
            WHERE id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_rows(rows)
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    async fn create(&self, profile: &Profile) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO profiles (id, username, account_type, application_status, is_verified,
                                  avatar_url, bio, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(profile.id.into_inner())
        .bind(&profile.username)
        .bind(profile.account_type.as_str())
        .bind(profile.application_status.map(|s| s.as_str()))
        .bind(profile.is_verified)
        .bind(&profile.avatar_url)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ProfileExists))?;

        Ok(())
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    async fn update(&self, profile: &Profile) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE profiles
            SET username = $2, account_type = $3, application_status = $4, is_verified = $5,
                avatar_url = $6, bio = $7, location = $8, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(profile.id.into_inner())
        .bind(&profile.username)
        .bind(profile.account_type.as_str())
        .bind(profile.application_status.map(|s| s.as_str()))
        .bind(profile.is_verified)
        .bind(&profile.avatar_url)
        .bind(&profile.bio)
        .bind(&profile.location)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProfileNotFound(profile.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_ids_by_account_type(&self, account_type: AccountType) -> RepoResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT id FROM profiles WHERE account_type = $1 ORDER BY created_at
            ",
        )
        .bind(account_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Id::from_uuid).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgProfileRepository>();
    }
}
