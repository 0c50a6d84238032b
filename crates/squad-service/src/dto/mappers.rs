//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use squad_core::{
    ChatMessage, ChatRoom, Game, Notification, Order, Profile, Review, StatusCount,
};

use super::responses::{
    ChatMessageResponse, ChatRoomResponse, GameResponse, NotificationResponse, OrderResponse,
    ProfileResponse, ProfileSummary, ReviewResponse, StatusCountResponse,
};

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            account_type: profile.account_type,
            application_status: profile.application_status,
            is_verified: profile.is_verified,
            avatar_url: profile.avatar_url.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            created_at: profile.created_at,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self::from(&profile)
    }
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            avatar_url: profile.avatar_url.clone(),
            account_type: profile.account_type,
        }
    }
}

// ============================================================================
// Catalog Mappers
// ============================================================================

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            slug: game.slug.clone(),
            description: game.description.clone(),
            image_url: game.image_url.clone(),
        }
    }
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self::from(&game)
    }
}

// ============================================================================
// Order Mappers
// ============================================================================

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number.to_string(),
            customer_id: order.customer_id,
            pro_id: order.pro_id,
            game_id: order.game_id,
            order_type: order.order_type,
            status: order.status,
            game_count: order.game_count,
            price_per_game_cents: order.price_per_game.cents(),
            total_price_cents: order.total_price.cents(),
            discord_username: order.discord_username.clone(),
            notes: order.notes.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            completed_at: order.completed_at,
            cancelled_at: order.cancelled_at,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self::from(&order)
    }
}

impl From<StatusCount> for StatusCountResponse {
    fn from(count: StatusCount) -> Self {
        Self {
            status: count.status,
            count: count.count,
        }
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl From<&ChatRoom> for ChatRoomResponse {
    fn from(room: &ChatRoom) -> Self {
        Self {
            id: room.id,
            order_id: room.order_id,
            pro_id: room.pro_id,
            customer_id: room.customer_id,
            status: room.status,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

impl From<ChatRoom> for ChatRoomResponse {
    fn from(room: ChatRoom) -> Self {
        Self::from(&room)
    }
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            chat_room_id: message.chat_room_id,
            sender_id: message.sender_id,
            message: message.message,
            read: message.read,
            archived: message.archived,
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            data: n.data,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

// ============================================================================
// Review Mappers
// ============================================================================

/// The reviewer summary is left empty; services fill it in
impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            order_id: review.order_id,
            reviewer_id: review.reviewer_id,
            reviewee_id: review.reviewee_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
            reviewer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_core::{AccountType, Id, Money, OrderDraft};

    #[test]
    fn test_order_prices_in_cents() {
        let order = Order::place(OrderDraft {
            customer_id: Id::new(),
            pro_id: None,
            game_id: Id::new(),
            order_type: None,
            game_count: 2,
            price_per_game: Money::from_cents(400),
            discord_username: "player".to_string(),
            notes: String::new(),
        })
        .unwrap();

        let response = OrderResponse::from(&order);
        assert_eq!(response.price_per_game_cents, 400);
        assert_eq!(response.total_price_cents, 800);
        assert!(response.order_number.starts_with("ORD-"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["order_type"], "quick-match");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_profile_summary() {
        let profile = Profile::new(Id::new(), "coach".to_string(), AccountType::Pro);
        let summary = ProfileSummary::from(&profile);
        assert_eq!(summary.username, "coach");
        assert_eq!(summary.account_type, AccountType::Pro);

        let full = ProfileResponse::from(&profile);
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["application_status"], "pending");
    }
}
