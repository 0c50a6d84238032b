//! PostgreSQL implementation of OrderRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use squad_core::entities::{Order, OrderStatus};
use squad_core::traits::{OrderQuery, OrderRepository, RepoResult, StatusCount};
use squad_core::value_objects::Id;

use crate::mappers::{status_filter, status_names};
use crate::models::{OrderModel, StatusCountModel};

use super::error::{convert_rows, map_db_error};

/// Largest page an order listing may request
const MAX_LIST_LIMIT: i64 = 200;

/// PostgreSQL implementation of OrderRepository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new PgOrderRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Order>> {
        let result = sqlx::query_as::<_, OrderModel>(
            r"
            SELECT id, order_number, customer_id, pro_id, game_id, order_type, status,
                   game_count, price_per_game, total_price, discord_username, notes,
                   created_at, updated_at, completed_at, cancelled_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Order::try_from).transpose()
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, order_number = %order.order_number))]
    async fn create(&self, order: &Order) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO orders (id, order_number, customer_id, pro_id, game_id, order_type, status,
                                game_count, price_per_game, total_price, discord_username, notes,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(order.id.into_inner())
        .bind(order.order_number.as_str())
        .bind(order.customer_id.into_inner())
        .bind(order.pro_id.map(Id::into_inner))
        .bind(order.game_id.into_inner())
        .bind(order.order_type.as_str())
        .bind(order.status.as_str())
        .bind(order.game_count)
        .bind(order.price_per_game.cents())
        .bind(order.total_price.cents())
        .bind(&order.discord_username)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &OrderQuery) -> RepoResult<Vec<Order>> {
        let limit = query.limit.clamp(1, MAX_LIST_LIMIT);
        let offset = query.offset.max(0);

        let rows = sqlx::query_as::<_, OrderModel>(
            r"
            SELECT id, order_number, customer_id, pro_id, game_id, order_type, status,
                   game_count, price_per_game, total_price, discord_username, notes,
                   created_at, updated_at, completed_at, cancelled_at
            FROM orders
            WHERE ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::uuid IS NULL OR pro_id = $2)
              AND ($3::text[] IS NULL OR status = ANY($3))
              AND (NOT $4 OR pro_id IS NULL)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(query.customer_id.map(Id::into_inner))
        .bind(query.pro_id.map(Id::into_inner))
        .bind(status_filter(query.status))
        .bind(query.unclaimed)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_rows(rows)
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self) -> RepoResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCountModel>(
            r"
            SELECT status, COUNT(*) AS count
            FROM orders
            GROUP BY status
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // Fold legacy names into their canonical status
        let mut counts: Vec<StatusCount> = OrderStatus::ALL
            .iter()
            .map(|&status| StatusCount { status, count: 0 })
            .collect();
        for row in rows {
            match OrderStatus::parse(&row.status) {
                Some(status) => {
                    if let Some(entry) = counts.iter_mut().find(|c| c.status == status) {
                        entry.count += row.count;
                    }
                }
                None => warn!(status = %row.status, "Skipping unknown order status in counts"),
            }
        }

        Ok(counts)
    }

    #[instrument(skip(self))]
    async fn accept(&self, id: Id, pro_id: Id) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET pro_id = $2, status = 'accepted', updated_at = NOW()
            WHERE id = $1
              AND status = 'pending'
              AND (pro_id IS NULL OR pro_id = $2)
            ",
        )
        .bind(id.into_inner())
        .bind(pro_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn transition(&self, id: Id, from: &[OrderStatus], to: OrderStatus) -> RepoResult<bool> {
        let from = status_names(from);

        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $3::text,
                updated_at = NOW(),
                completed_at = CASE WHEN $3::text = 'completed' THEN NOW() ELSE completed_at END,
                cancelled_at = CASE WHEN $3::text = 'cancelled' THEN NOW() ELSE cancelled_at END
            WHERE id = $1 AND status = ANY($2)
            ",
        )
        .bind(id.into_inner())
        .bind(&from)
        .bind(to.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Id, status: OrderStatus) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $2::text,
                updated_at = NOW(),
                completed_at = CASE WHEN $2::text = 'completed' THEN NOW() ELSE completed_at END,
                cancelled_at = CASE WHEN $2::text = 'cancelled' THEN NOW() ELSE cancelled_at END
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgOrderRepository>();
    }

    #[test]
    fn test_uuid_binding_type() {
        let id = Id::new();
        let raw: Uuid = id.into_inner();
        assert_eq!(Id::from_uuid(raw), id);
    }
}
