//! PostgreSQL implementation of ChatRoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use squad_core::entities::{ChatRoom, ChatRoomStatus};
use squad_core::error::DomainError;
use squad_core::traits::{ChatRoomRepository, RepoResult};
use squad_core::value_objects::Id;

use crate::models::ChatRoomModel;

use super::error::{convert_rows, map_db_error};

/// PostgreSQL implementation of ChatRoomRepository
#[derive(Clone)]
pub struct PgChatRoomRepository {
    pool: PgPool,
}

impl PgChatRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRoomRepository for PgChatRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<ChatRoom>> {
        let result = sqlx::query_as::<_, ChatRoomModel>(
            r"
            SELECT id, order_id, pro_id, customer_id, status, created_at, updated_at
            FROM chat_rooms
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChatRoom::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_order(&self, order_id: Id) -> RepoResult<Option<ChatRoom>> {
        let result = sqlx::query_as::<_, ChatRoomModel>(
            r"
            SELECT id, order_id, pro_id, customer_id, status, created_at, updated_at
            FROM chat_rooms
            WHERE order_id = $1
            ",
        )
        .bind(order_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChatRoom::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Id) -> RepoResult<Vec<ChatRoom>> {
        let rows = sqlx::query_as::<_, ChatRoomModel>(
            r"
            SELECT id, order_id, pro_id, customer_id, status, created_at, updated_at
            FROM chat_rooms
            WHERE customer_id = $1 OR pro_id = $1
            ORDER BY updated_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_rows(rows)
    }

    #[instrument(skip(self, room), fields(order_id = %room.order_id))]
    async fn create_if_absent(&self, room: &ChatRoom) -> RepoResult<(ChatRoom, bool)> {
        // The unique index on order_id makes concurrent callers converge on one row
        let inserted = sqlx::query_as::<_, ChatRoomModel>(
            r"
            INSERT INTO chat_rooms (id, order_id, pro_id, customer_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING id, order_id, pro_id, customer_id, status, created_at, updated_at
            ",
        )
        .bind(room.id.into_inner())
        .bind(room.order_id.into_inner())
        .bind(room.pro_id.into_inner())
        .bind(room.customer_id.into_inner())
        .bind(room.status.as_str())
        .bind(room.created_at)
        .bind(room.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(row) = inserted {
            return Ok((ChatRoom::try_from(row)?, true));
        }

        let existing = self.find_by_order(room.order_id).await?.ok_or_else(|| {
            DomainError::InternalError(format!(
                "chat room for order {} vanished after conflict",
                room.order_id
            ))
        })?;
        Ok((existing, false))
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Id, status: ChatRoomStatus) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE chat_rooms
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Id) -> RepoResult<()> {
        sqlx::query("UPDATE chat_rooms SET updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
