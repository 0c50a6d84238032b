//! Gateway event types
//!
//! The names sent in the `t` field of dispatch frames.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// Sent after a successful Identify
    Ready,

    // Orders
    OrderCreated,
    OrderUpdated,

    // Chat
    ChatRoomCreated,
    ChatRoomClosed,
    ChatMessageCreated,
    ChatMessagesRead,

    // Notifications
    NotificationCreated,
    NotificationsRead,
    NotificationDeleted,
}

impl GatewayEventType {
    pub const ALL: [Self; 10] = [
        Self::Ready,
        Self::OrderCreated,
        Self::OrderUpdated,
        Self::ChatRoomCreated,
        Self::ChatRoomClosed,
        Self::ChatMessageCreated,
        Self::ChatMessagesRead,
        Self::NotificationCreated,
        Self::NotificationsRead,
        Self::NotificationDeleted,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::OrderCreated => "ORDER_CREATED",
            Self::OrderUpdated => "ORDER_UPDATED",
            Self::ChatRoomCreated => "CHAT_ROOM_CREATED",
            Self::ChatRoomClosed => "CHAT_ROOM_CLOSED",
            Self::ChatMessageCreated => "CHAT_MESSAGE_CREATED",
            Self::ChatMessagesRead => "CHAT_MESSAGES_READ",
            Self::NotificationCreated => "NOTIFICATION_CREATED",
            Self::NotificationsRead => "NOTIFICATIONS_READ",
            Self::NotificationDeleted => "NOTIFICATION_DELETED",
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event name that no dispatch maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

impl FromStr for GatewayEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
