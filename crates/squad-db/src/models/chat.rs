//! Chat room and message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for chat_rooms table
#[derive(Debug, Clone, FromRow)]
pub struct ChatRoomModel {
    pub id: Uuid,
    pub order_id: Uuid,
    pub pro_id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for chat_messages table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: Uuid,
    pub chat_room_id: Uuid,
    pub sender_id: Uuid,
    pub message: String,
    pub read: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}
