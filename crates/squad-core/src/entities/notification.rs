//! Notification entity - a message addressed to one user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OrderCreated,
    NewOrder,
    NewQuickMatch,
    OrderAccepted,
    OrderCompleted,
    OrderCancelled,
    NewMessage,
}

impl NotificationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::NewOrder => "new_order",
            Self::NewQuickMatch => "new_quick_match",
            Self::OrderAccepted => "order_accepted",
            Self::OrderCompleted => "order_completed",
            Self::OrderCancelled => "order_cancelled",
            Self::NewMessage => "new_message",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "order_created" => Some(Self::OrderCreated),
            "new_order" => Some(Self::NewOrder),
            "new_quick_match" => Some(Self::NewQuickMatch),
            "order_accepted" => Some(Self::OrderAccepted),
            "order_completed" => Some(Self::OrderCompleted),
            "order_cancelled" => Some(Self::OrderCancelled),
            "new_message" => Some(Self::NewMessage),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Id,
    pub user_id: Id,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    /// Free-form payload, e.g. `{"order_id": ..., "order_number": ...}`
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification. Rejects the nil placeholder recipient.
    pub fn new(
        user_id: Id,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Result<Self, DomainError> {
        if user_id.is_nil() {
            return Err(DomainError::InvalidUserId);
        }

        Ok(Self {
            id: Id::new(),
            user_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            data,
            read: false,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nil_user() {
        let err = Notification::new(
            Id::nil(),
            NotificationType::NewMessage,
            "New Message",
            "hi",
            serde_json::Value::Null,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidUserId));
    }

    #[test]
    fn test_new_is_unread() {
        let n = Notification::new(
            Id::new(),
            NotificationType::OrderAccepted,
            "Order Accepted",
            "Your order has been accepted",
            serde_json::json!({"order_id": "x"}),
        )
        .unwrap();
        assert!(!n.read);
        assert_eq!(n.data["order_id"], "x");
    }

    #[test]
    fn test_type_roundtrip() {
        for ty in [
            NotificationType::OrderCreated,
            NotificationType::NewOrder,
            NotificationType::NewQuickMatch,
            NotificationType::OrderAccepted,
            NotificationType::OrderCompleted,
            NotificationType::OrderCancelled,
            NotificationType::NewMessage,
        ] {
            assert_eq!(NotificationType::parse(ty.as_str()), Some(ty));
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }
}
