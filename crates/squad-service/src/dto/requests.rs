//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation,
//! and `Serialize` so the client library can send them.

use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Profile Requests
// ============================================================================

/// Complete sign-up or edit the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    /// `player` or `pro`; only honoured when the profile is created
    pub account_type: Option<String>,

    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

/// Staff decision on a pro application
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewApplicationRequest {
    /// `approved` or `rejected`
    #[validate(length(min = 1, max = 32, message = "Status is required"))]
    pub status: String,
}

// ============================================================================
// Order Requests
// ============================================================================

/// Place an order. Without `pro_id` it becomes a quick match.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Pro to book directly
    pub pro_id: Option<String>,

    /// Game name; unknown names create a catalog entry
    #[validate(length(min = 1, max = 100, message = "Game must be 1-100 characters"))]
    pub game: String,

    /// `quick-match` or `direct-booking`; inferred from `pro_id` when absent
    pub order_type: Option<String>,

    #[validate(range(min = 1, max = 100, message = "Game count must be 1-100"))]
    pub game_count: i32,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_per_game_cents: i64,

    #[validate(length(min = 1, max = 64, message = "Discord username is required"))]
    pub discord_username: String,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    #[serde(default)]
    pub notes: String,
}

/// Staff override of an order's status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, max = 32, message = "Status is required"))]
    pub status: String,
}

/// Filter for the caller's own orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

/// Admin order overview
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminOrdersQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ============================================================================
// Chat Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

/// Chat history page selector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesQuery {
    /// 0 is the newest page
    pub page: Option<i64>,
    #[serde(default)]
    pub include_archived: bool,
}

// ============================================================================
// Notification Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

// ============================================================================
// Review Requests
// ============================================================================

/// Rate the pro of a completed order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i16,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Staff review listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Self-reported stats for one game
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateGameProfileRequest {
    #[validate(length(max = 50, message = "Rank must be at most 50 characters"))]
    pub rank: Option<String>,

    #[validate(range(min = 0, message = "Hours played must not be negative"))]
    #[serde(default)]
    pub hours_played: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            pro_id: None,
            game: "Valorant".to_string(),
            order_type: None,
            game_count: 2,
            price_per_game_cents: 400,
            discord_username: "player#1234".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_create_order_validation() {
        assert!(order_request().validate().is_ok());

        let no_discord = CreateOrderRequest {
            discord_username: String::new(),
            ..order_request()
        };
        let err = no_discord.validate().unwrap_err();
        assert!(err.to_string().contains("Discord username is required"));

        let zero_games = CreateOrderRequest {
            game_count: 0,
            ..order_request()
        };
        assert!(zero_games.validate().is_err());

        let negative_price = CreateOrderRequest {
            price_per_game_cents: -1,
            ..order_request()
        };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn test_send_message_validation() {
        let valid = SendMessageRequest {
            message: "gg".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = SendMessageRequest {
            message: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = SendMessageRequest {
            message: "a".repeat(2001),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_profile_validation() {
        let valid = UpsertProfileRequest {
            username: "ace".to_string(),
            account_type: Some("pro".to_string()),
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
            bio: None,
            location: None,
        };
        assert!(valid.validate().is_ok());

        let bad_avatar = UpsertProfileRequest {
            avatar_url: Some("not a url".to_string()),
            ..valid.clone()
        };
        assert!(bad_avatar.validate().is_err());

        let short_name = UpsertProfileRequest {
            username: "a".to_string(),
            ..valid
        };
        assert!(short_name.validate().is_err());
    }

    #[test]
    fn test_review_validation() {
        let valid = CreateReviewRequest {
            rating: 5,
            comment: Some("Great callouts".to_string()),
        };
        assert!(valid.validate().is_ok());

        let zero = CreateReviewRequest {
            rating: 0,
            comment: None,
        };
        assert!(zero.validate().is_err());

        let long = CreateReviewRequest {
            rating: 3,
            comment: Some("a".repeat(1001)),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_queries_default_from_empty_json() {
        let q: MessagesQuery = serde_json::from_str("{}").unwrap();
        assert!(q.page.is_none());
        assert!(!q.include_archived);

        let q: NotificationsQuery = serde_json::from_str(r#"{"unread_only":true}"#).unwrap();
        assert!(q.unread_only);
    }
}
