//! PostgreSQL implementation of ReviewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use squad_core::entities::Review;
use squad_core::error::DomainError;
use squad_core::traits::{RepoResult, ReviewRepository};
use squad_core::value_objects::Id;

use crate::models::ReviewModel;

use super::error::{map_db_error, map_unique_violation};

/// Largest page a review listing may request
const MAX_LIST_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Review>> {
        let result = sqlx::query_as::<_, ReviewModel>(
            r"
            SELECT id, order_id, reviewer_id, reviewee_id, rating, comment, created_at
            FROM reviews
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Review::from))
    }

    #[instrument(skip(self, review), fields(order_id = %review.order_id))]
    async fn create(&self, review: &Review) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reviews (id, order_id, reviewer_id, reviewee_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(review.id.into_inner())
        .bind(review.order_id.into_inner())
        .bind(review.reviewer_id.into_inner())
        .bind(review.reviewee_id.into_inner())
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReviewExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_reviewee(&self, reviewee_id: Id, limit: i64) -> RepoResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewModel>(
            r"
            SELECT id, order_id, reviewer_id, reviewee_id, rating, comment, created_at
            FROM reviews
            WHERE reviewee_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(reviewee_id.into_inner())
        .bind(limit.clamp(1, MAX_LIST_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewModel>(
            r"
            SELECT id, order_id, reviewer_id, reviewee_id, rating, comment, created_at
            FROM reviews
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit.clamp(1, MAX_LIST_LIMIT))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
