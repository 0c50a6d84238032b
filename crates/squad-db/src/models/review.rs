//! Review and game profile database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ReviewModel {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct GameProfileModel {
    pub profile_id: Uuid,
    pub game_id: Uuid,
    pub rank: Option<String>,
    pub hours_played: i32,
    pub updated_at: DateTime<Utc>,
}
