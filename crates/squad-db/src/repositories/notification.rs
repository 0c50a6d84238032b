//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use squad_core::entities::Notification;
use squad_core::traits::{NotificationRepository, RepoResult};
use squad_core::value_objects::Id;

use crate::models::NotificationModel;

use super::error::{convert_rows, map_db_error};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Notification>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, type, title, message, data, read, created_at
            FROM notifications
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Notification::try_from).transpose()
    }

    #[instrument(skip(self, notification), fields(user_id = %notification.user_id))]
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO notifications (id, user_id, type, title, message, data, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(notification.id.into_inner())
        .bind(notification.user_id.into_inner())
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.data)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, notifications), fields(count = notifications.len()))]
    async fn create_many(&self, notifications: &[Notification]) -> RepoResult<u64> {
        if notifications.is_empty() {
            return Ok(0);
        }

        let len = notifications.len();
        let mut ids: Vec<Uuid> = Vec::with_capacity(len);
        let mut user_ids: Vec<Uuid> = Vec::with_capacity(len);
        let mut types: Vec<&str> = Vec::with_capacity(len);
        let mut titles: Vec<&str> = Vec::with_capacity(len);
        let mut messages: Vec<&str> = Vec::with_capacity(len);
        let mut data: Vec<serde_json::Value> = Vec::with_capacity(len);
        let mut created: Vec<DateTime<Utc>> = Vec::with_capacity(len);
        for n in notifications {
            ids.push(n.id.into_inner());
            user_ids.push(n.user_id.into_inner());
            types.push(n.notification_type.as_str());
            titles.push(&n.title);
            messages.push(&n.message);
            data.push(n.data.clone());
            created.push(n.created_at);
        }

        let result = sqlx::query(
            r"
            INSERT INTO notifications (id, user_id, type, title, message, data, created_at)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::text[], $5::text[],
                                 $6::jsonb[], $7::timestamptz[])
            ",
        )
        .bind(&ids)
        .bind(&user_ids)
        .bind(&types)
        .bind(&titles)
        .bind(&messages)
        .bind(&data)
        .bind(&created)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        limit: i64,
    ) -> RepoResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, type, title, message, data, read, created_at
            FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR NOT read)
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(unread_only)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_rows(rows)
    }

    #[instrument(skip(self))]
    async fn count_unread(&self, user_id: Id) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: Id, user_id: Id) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, user_id: Id) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id, user_id: Id) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
