//! Domain events - emitted when marketplace state changes
//!
//! Events are pushed to the affected users' live connections. Each event
//! knows its own recipients, so publishers never have to look them up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    ChatMessage, ChatRoom, Notification, NotificationType, Order, OrderStatus, OrderType,
};
use crate::value_objects::Id;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Order Events
    // =========================================================================
    OrderCreated(OrderEvent),
    OrderUpdated(OrderEvent),

    // =========================================================================
    // Chat Events
    // =========================================================================
    ChatRoomCreated(ChatRoomEvent),
    ChatRoomClosed(ChatRoomEvent),
    ChatMessageCreated(ChatMessageCreatedEvent),
    ChatMessagesRead(ChatMessagesReadEvent),

    // =========================================================================
    // Notification Events
    // =========================================================================
    NotificationCreated(NotificationCreatedEvent),
    NotificationsRead(NotificationsReadEvent),
    NotificationDeleted(NotificationDeletedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OrderCreated(_) => "ORDER_CREATED",
            Self::OrderUpdated(_) => "ORDER_UPDATED",
            Self::ChatRoomCreated(_) => "CHAT_ROOM_CREATED",
            Self::ChatRoomClosed(_) => "CHAT_ROOM_CLOSED",
            Self::ChatMessageCreated(_) => "CHAT_MESSAGE_CREATED",
            Self::ChatMessagesRead(_) => "CHAT_MESSAGES_READ",
            Self::NotificationCreated(_) => "NOTIFICATION_CREATED",
            Self::NotificationsRead(_) => "NOTIFICATIONS_READ",
            Self::NotificationDeleted(_) => "NOTIFICATION_DELETED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::OrderCreated(e) | Self::OrderUpdated(e) => e.timestamp,
            Self::ChatRoomCreated(e) | Self::ChatRoomClosed(e) => e.timestamp,
            Self::ChatMessageCreated(e) => e.timestamp,
            Self::ChatMessagesRead(e) => e.timestamp,
            Self::NotificationCreated(e) => e.created_at,
            Self::NotificationsRead(e) => e.timestamp,
            Self::NotificationDeleted(e) => e.timestamp,
        }
    }

    /// Users whose live connections should receive this event
    pub fn recipients(&self) -> Vec<Id> {
        match self {
            Self::OrderCreated(e) | Self::OrderUpdated(e) => {
                let mut users = vec![e.customer_id];
                users.extend(e.pro_id);
                users
            }
            Self::ChatRoomCreated(e) | Self::ChatRoomClosed(e) => vec![e.customer_id, e.pro_id],
            Self::ChatMessageCreated(e) => vec![e.customer_id, e.pro_id],
            Self::ChatMessagesRead(e) => vec![e.reader_id, e.sender_id],
            Self::NotificationCreated(e) => vec![e.user_id],
            Self::NotificationsRead(e) => vec![e.user_id],
            Self::NotificationDeleted(e) => vec![e.user_id],
        }
    }

    /// Event payload without the type tag
    pub fn payload(&self) -> serde_json::Value {
        let value = match self {
            Self::OrderCreated(e) | Self::OrderUpdated(e) => serde_json::to_value(e),
            Self::ChatRoomCreated(e) | Self::ChatRoomClosed(e) => serde_json::to_value(e),
            Self::ChatMessageCreated(e) => serde_json::to_value(e),
            Self::ChatMessagesRead(e) => serde_json::to_value(e),
            Self::NotificationCreated(e) => serde_json::to_value(e),
            Self::NotificationsRead(e) => serde_json::to_value(e),
            Self::NotificationDeleted(e) => serde_json::to_value(e),
        };
        value.unwrap_or_default()
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: Id,
    pub order_number: String,
    pub customer_id: Id,
    pub pro_id: Option<Id>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoomEvent {
    pub chat_room_id: Id,
    pub order_id: Id,
    pub customer_id: Id,
    pub pro_id: Id,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageCreatedEvent {
    pub message_id: Id,
    pub chat_room_id: Id,
    pub sender_id: Id,
    pub customer_id: Id,
    pub pro_id: Id,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessagesReadEvent {
    pub chat_room_id: Id,
    pub reader_id: Id,
    /// Author of the messages that were flipped to read
    pub sender_id: Id,
    pub count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Carries the whole notification so clients can prepend it without a fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreatedEvent {
    pub id: Id,
    pub user_id: Id,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsReadEvent {
    pub user_id: Id,
    /// `None` when every notification of the user was marked read
    pub notification_id: Option<Id>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDeletedEvent {
    pub user_id: Id,
    pub notification_id: Id,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Constructors
// ============================================================================

impl From<&Order> for OrderEvent {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            order_number: order.order_number.to_string(),
            customer_id: order.customer_id,
            pro_id: order.pro_id,
            order_type: order.order_type,
            status: order.status,
            timestamp: Utc::now(),
        }
    }
}

impl From<&ChatRoom> for ChatRoomEvent {
    fn from(room: &ChatRoom) -> Self {
        Self {
            chat_room_id: room.id,
            order_id: room.order_id,
            customer_id: room.customer_id,
            pro_id: room.pro_id,
            timestamp: Utc::now(),
        }
    }
}

impl ChatMessageCreatedEvent {
    pub fn new(message: &ChatMessage, room: &ChatRoom) -> Self {
        Self {
            message_id: message.id,
            chat_room_id: room.id,
            sender_id: message.sender_id,
            customer_id: room.customer_id,
            pro_id: room.pro_id,
            timestamp: message.created_at,
        }
    }
}

impl ChatMessagesReadEvent {
    pub fn new(chat_room_id: Id, reader_id: Id, sender_id: Id, count: u64) -> Self {
        Self {
            chat_room_id,
            reader_id,
            sender_id,
            count,
            timestamp: Utc::now(),
        }
    }
}

impl From<&Notification> for NotificationCreatedEvent {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            notification_type: n.notification_type,
            title: n.title.clone(),
            message: n.message.clone(),
            data: n.data.clone(),
            read: n.read,
            created_at: n.created_at,
        }
    }
}

impl NotificationsReadEvent {
    pub fn new(user_id: Id, notification_id: Option<Id>) -> Self {
        Self {
            user_id,
            notification_id,
            timestamp: Utc::now(),
        }
    }
}

impl NotificationDeletedEvent {
    pub fn new(user_id: Id, notification_id: Id) -> Self {
        Self {
            user_id,
            notification_id,
            timestamp: Utc::now(),
        }
    }
}
