//! Chat room and chat message entities - one room per order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoomStatus {
    #[default]
    Active,
    Closed,
}

impl ChatRoomStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ChatRoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat room between the customer and the pro of one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: Id,
    pub order_id: Id,
    pub pro_id: Id,
    pub customer_id: Id,
    pub status: ChatRoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRoom {
    #[must_use]
    pub fn new(id: Id, order_id: Id, pro_id: Id, customer_id: Id) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_id,
            pro_id,
            customer_id,
            status: ChatRoomStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_participant(&self, user_id: Id) -> bool {
        self.pro_id == user_id || self.customer_id == user_id
    }

    /// The other participant, or `None` if `user_id` is not in the room
    pub fn counterpart(&self, user_id: Id) -> Option<Id> {
        if user_id == self.pro_id {
            Some(self.customer_id)
        } else if user_id == self.customer_id {
            Some(self.pro_id)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.status == ChatRoomStatus::Closed
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Id,
    pub chat_room_id: Id,
    pub sender_id: Id,
    pub message: String,
    pub read: bool,
    /// Set by the retention job; archived messages are hidden by default
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(id: Id, chat_room_id: Id, sender_id: Id, message: String) -> Self {
        Self {
            id,
            chat_room_id,
            sender_id,
            message,
            read: false,
            archived: false,
            created_at: Utc::now(),
        }
    }

    /// Preview for notifications, cut at `max_chars` with a trailing `...`
    pub fn preview(&self, max_chars: usize) -> String {
        match self.message.char_indices().nth(max_chars) {
            Some((end, _)) => format!("{}...", &self.message[..end]),
            None => self.message.clone(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart() {
        let pro = Id::new();
        let customer = Id::new();
        let room = ChatRoom::new(Id::new(), Id::new(), pro, customer);

        assert_eq!(room.counterpart(pro), Some(customer));
        assert_eq!(room.counterpart(customer), Some(pro));
        assert_eq!(room.counterpart(Id::new()), None);
        assert!(room.is_participant(pro));
        assert!(!room.is_participant(Id::new()));
    }

    #[test]
    fn test_preview() {
        let short = ChatMessage::new(Id::new(), Id::new(), Id::new(), "gg".to_string());
        assert_eq!(short.preview(50), "gg");

        let long = ChatMessage::new(Id::new(), Id::new(), Id::new(), "a".repeat(60));
        let preview = long.preview(50);
        assert_eq!(preview.len(), 53);
        assert!(preview.ends_with("..."));

        let exact = ChatMessage::new(Id::new(), Id::new(), Id::new(), "b".repeat(50));
        assert_eq!(exact.preview(50), "b".repeat(50));
    }

    #[test]
    fn test_preview_multibyte() {
        let msg = ChatMessage::new(Id::new(), Id::new(), Id::new(), "é".repeat(10));
        assert_eq!(msg.preview(3), "ééé...");
    }
}
