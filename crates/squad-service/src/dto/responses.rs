//! Response DTOs for API endpoints
//!
//! Serialized by the API and deserialized again by the client library.
//! Prices are integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_core::{
    AccountType, ApplicationStatus, ChatRoomStatus, Id, NotificationType, OrderStatus, OrderType,
};

// ============================================================================
// Common Response Types
// ============================================================================

/// A bare counter (`{"count": n}`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

// ============================================================================
// Profile Responses
// ============================================================================

/// Full profile, returned to its owner and to staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Id,
    pub username: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Just enough of a profile to label an order participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: Id,
    pub username: String,
    pub avatar_url: Option<String>,
    pub account_type: AccountType,
}

// ============================================================================
// Catalog Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: Id,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// ============================================================================
// Order Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Id,
    pub order_number: String,
    pub customer_id: Id,
    pub pro_id: Option<Id>,
    pub game_id: Id,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub game_count: i32,
    pub price_per_game_cents: i64,
    pub total_price_cents: i64,
    pub discord_username: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Order with its participants, game and chat room resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub customer: Option<ProfileSummary>,
    pub pro: Option<ProfileSummary>,
    pub game: Option<GameResponse>,
    pub chat_room_id: Option<Id>,
}

/// Result of a successful claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOrderResponse {
    pub order: OrderResponse,
    pub chat_room: ChatRoomResponse,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusCountResponse {
    pub status: OrderStatus,
    pub count: i64,
}

/// Admin dashboard: one page of orders plus totals per status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub counts: Vec<StatusCountResponse>,
    pub total: i64,
}

// ============================================================================
// Chat Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoomResponse {
    pub id: Id,
    pub order_id: Id,
    pub pro_id: Id,
    pub customer_id: Id,
    pub status: ChatRoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub id: Id,
    pub chat_room_id: Id,
    pub sender_id: Id,
    pub message: String,
    pub read: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of history, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePageResponse {
    pub messages: Vec<ChatMessageResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub has_more: bool,
}

impl MessagePageResponse {
    /// `has_more` is true while older pages exist beyond this one
    pub fn new(messages: Vec<ChatMessageResponse>, page: i64, page_size: i64, total: i64) -> Self {
        let seen = (page.max(0) + 1).saturating_mul(page_size);
        Self {
            messages,
            page,
            page_size,
            total,
            has_more: total > seen,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub archived: u64,
    pub cutoff: DateTime<Utc>,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Id,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Review Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Id,
    pub order_id: Id,
    pub reviewer_id: Id,
    pub reviewee_id: Id,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Resolved when the reviewer's profile still exists
    #[serde(default)]
    pub reviewer: Option<ProfileSummary>,
}

/// Reviews about one profile with their average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReviewsResponse {
    pub profile_id: Id,
    pub count: usize,
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfileResponse {
    pub game: GameResponse,
    pub rank: Option<String>,
    pub hours_played: i32,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_page_has_more() {
        let page = MessagePageResponse::new(vec![], 0, 50, 120);
        assert!(page.has_more);

        let page = MessagePageResponse::new(vec![], 2, 50, 120);
        assert!(!page.has_more);

        let page = MessagePageResponse::new(vec![], 0, 50, 50);
        assert!(!page.has_more);
    }

    #[test]
    fn test_readiness() {
        assert!(ReadinessResponse::ready(true, true).is_ready());

        let degraded = ReadinessResponse::ready(true, false);
        assert!(!degraded.is_ready());
        assert_eq!(degraded.checks.redis, "unhealthy");
    }

    #[test]
    fn test_notification_type_field_name() {
        let response = NotificationResponse {
            id: Id::new(),
            notification_type: NotificationType::NewQuickMatch,
            title: "New Quick Match".to_string(),
            message: "x".to_string(),
            data: serde_json::json!({}),
            read: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "new_quick_match");
    }
}
