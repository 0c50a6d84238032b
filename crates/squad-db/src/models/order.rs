//! Order database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for orders table.
///
/// Money columns are integer cents.
#[derive(Debug, Clone, FromRow)]
pub struct OrderModel {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub pro_id: Option<Uuid>,
    pub game_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub game_count: i32,
    pub price_per_game: i64,
    pub total_price: i64,
    pub discord_username: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Row of `SELECT status, COUNT(*) ... GROUP BY status`
#[derive(Debug, Clone, FromRow)]
pub struct StatusCountModel {
    pub status: String,
    pub count: i64,
}
