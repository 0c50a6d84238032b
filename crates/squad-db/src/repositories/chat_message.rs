//! PostgreSQL implementation of ChatMessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use squad_core::entities::ChatMessage;
use squad_core::traits::{ChatMessageRepository, MessagePage, RepoResult};
use squad_core::value_objects::Id;

use crate::models::ChatMessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ChatMessageRepository
#[derive(Clone)]
pub struct PgChatMessageRepository {
    pool: PgPool,
}

impl PgChatMessageRepository {
    /// Create a new PgChatMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatMessageRepository for PgChatMessageRepository {
    #[instrument(skip(self, message), fields(chat_room_id = %message.chat_room_id))]
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, chat_room_id, sender_id, message, read, archived, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.chat_room_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.message)
        .bind(message.read)
        .bind(message.archived)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_page(&self, chat_room_id: Id, page: MessagePage) -> RepoResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessageModel>(
            r"
            SELECT id, chat_room_id, sender_id, message, read, archived, created_at
            FROM chat_messages
            WHERE chat_room_id = $1 AND ($2 OR NOT archived)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(chat_room_id.into_inner())
        .bind(page.include_archived)
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, chat_room_id: Id, include_archived: bool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM chat_messages
            WHERE chat_room_id = $1 AND ($2 OR NOT archived)
            ",
        )
        .bind(chat_room_id.into_inner())
        .bind(include_archived)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn mark_read_from(&self, chat_room_id: Id, sender_id: Id) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE chat_messages
            SET read = TRUE
            WHERE chat_room_id = $1 AND sender_id = $2 AND NOT read
            ",
        )
        .bind(chat_room_id.into_inner())
        .bind(sender_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn count_unread_for(&self, user_id: Id) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM chat_messages m
            JOIN chat_rooms r ON r.id = m.chat_room_id
            WHERE (r.customer_id = $1 OR r.pro_id = $1)
              AND m.sender_id <> $1
              AND NOT m.read
              AND NOT m.archived
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn archive_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE chat_messages m
            SET archived = TRUE
            FROM chat_rooms r
            WHERE r.id = m.chat_room_id
              AND r.status = 'closed'
              AND m.created_at < $1
              AND NOT m.archived
            ",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
