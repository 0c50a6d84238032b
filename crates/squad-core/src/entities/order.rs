//! Order entity - the central workflow object
//!
//! Lifecycle:
//!
//! ```text
//! pending --accept--> accepted --complete--> completed
//! pending | accepted --cancel--> cancelled
//! ```
//!
//! Staff may move an order to any status (see [`Order::force_status`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{Id, Money, OrderNumber};

/// How the order was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Unassigned, any pro may claim it
    #[serde(rename = "quick-match")]
    QuickMatch,
    /// Bound to a specific pro at creation
    #[serde(rename = "direct-booking")]
    DirectBooking,
}

impl OrderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuickMatch => "quick-match",
            Self::DirectBooking => "direct-booking",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quick-match" => Some(Self::QuickMatch),
            "direct-booking" => Some(Self::DirectBooking),
            _ => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        Self::Pending,
        Self::Accepted,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Older rows use these names for what is now `accepted`
    pub const LEGACY_ALIASES: [&'static str; 2] = ["confirmed", "in_progress"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status, mapping legacy aliases onto `Accepted`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" | "confirmed" | "in_progress" => Some(Self::Accepted),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether `value` is a legacy alias rather than a canonical name
    #[must_use]
    pub fn is_legacy_alias(value: &str) -> bool {
        Self::LEGACY_ALIASES.contains(&value)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the regular (non-staff) lifecycle allows `self -> next`
    #[must_use]
    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Accepted, Self::Completed)
                | (Self::Pending | Self::Accepted, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for placing an order
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: Id,
    pub pro_id: Option<Id>,
    pub game_id: Id,
    /// Derived from `pro_id` when absent
    pub order_type: Option<OrderType>,
    pub game_count: i32,
    pub price_per_game: Money,
    pub discord_username: String,
    pub notes: String,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Id,
    pub order_number: OrderNumber,
    pub customer_id: Id,
    /// `None` means an unclaimed quick match
    pub pro_id: Option<Id>,
    pub game_id: Id,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub game_count: i32,
    pub price_per_game: Money,
    pub total_price: Money,
    pub discord_username: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Validate a draft and build a pending order with a fresh order number
    pub fn place(draft: OrderDraft) -> Result<Self, DomainError> {
        if draft.customer_id.is_nil() {
            return Err(DomainError::InvalidUserId);
        }
        if draft.game_count < 1 {
            return Err(DomainError::ValidationError(
                "game_count must be at least 1".to_string(),
            ));
        }
        if draft.price_per_game.is_negative() {
            return Err(DomainError::ValidationError(
                "price_per_game must not be negative".to_string(),
            ));
        }
        if draft.discord_username.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "discord_username is required".to_string(),
            ));
        }
        if draft.pro_id == Some(draft.customer_id) {
            return Err(DomainError::ValidationError(
                "cannot book yourself".to_string(),
            ));
        }

        let order_type = match (draft.order_type, draft.pro_id) {
            (None, Some(_)) | (Some(OrderType::DirectBooking), Some(_)) => OrderType::DirectBooking,
            (None, None) | (Some(OrderType::QuickMatch), None) => OrderType::QuickMatch,
            (Some(OrderType::QuickMatch), Some(_)) => {
                return Err(DomainError::ValidationError(
                    "a quick match cannot name a pro".to_string(),
                ));
            }
            (Some(OrderType::DirectBooking), None) => {
                return Err(DomainError::ValidationError(
                    "a direct booking requires a pro".to_string(),
                ));
            }
        };

        let total_price = draft
            .price_per_game
            .checked_mul(draft.game_count)
            .ok_or_else(|| DomainError::ValidationError("total price overflows".to_string()))?;

        let now = Utc::now();
        Ok(Self {
            id: Id::new(),
            order_number: OrderNumber::generate(),
            customer_id: draft.customer_id,
            pro_id: draft.pro_id,
            game_id: draft.game_id,
            order_type,
            status: OrderStatus::Pending,
            game_count: draft.game_count,
            price_per_game: draft.price_per_game,
            total_price,
            discord_username: draft.discord_username.trim().to_string(),
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            completed_at: None,
            cancelled_at: None,
        })
    }

    /// Customer or assigned pro
    pub fn is_participant(&self, user_id: Id) -> bool {
        self.customer_id == user_id || self.pro_id == Some(user_id)
    }

    /// Pending and either unclaimed or already bound to this pro
    pub fn is_claimable_by(&self, pro_id: Id) -> bool {
        self.status == OrderStatus::Pending && self.pro_id.map_or(true, |p| p == pro_id)
    }

    /// Claim the order. Returns false when it is no longer claimable.
    pub fn accept(&mut self, pro_id: Id) -> bool {
        if !self.is_claimable_by(pro_id) {
            return false;
        }
        self.pro_id = Some(pro_id);
        self.status = OrderStatus::Accepted;
        self.updated_at = Utc::now();
        true
    }

    /// `accepted -> completed`
    pub fn complete(&mut self) -> bool {
        if !self.status.can_transition_to(OrderStatus::Completed) {
            return false;
        }
        self.force_status(OrderStatus::Completed);
        true
    }

    /// `pending | accepted -> cancelled`
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_transition_to(OrderStatus::Cancelled) {
            return false;
        }
        self.force_status(OrderStatus::Cancelled);
        true
    }

    /// Set any status, stamping completion/cancellation times
    pub fn force_status(&mut self, status: OrderStatus) {
        let now = Utc::now();
        match status {
            OrderStatus::Completed => self.completed_at = Some(now),
            OrderStatus::Cancelled => self.cancelled_at = Some(now),
            OrderStatus::Pending | OrderStatus::Accepted => {}
        }
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(pro_id: Option<Id>) -> OrderDraft {
        OrderDraft {
            customer_id: Id::new(),
            pro_id,
            game_id: Id::new(),
            order_type: None,
            game_count: 2,
            price_per_game: Money::from_cents(400),
            discord_username: "player#1234".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_quick_match_totals() {
        let order = Order::place(draft(None)).unwrap();
        assert_eq!(order.order_type, OrderType::QuickMatch);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.pro_id, None);
        assert_eq!(order.total_price, Money::from_cents(800));
        assert_eq!(order.total_price.to_string(), "$8.00");
        assert!(order.order_number.as_str().starts_with("ORD-"));
    }

    #[test]
    fn test_direct_booking_type_derived() {
        let order = Order::place(draft(Some(Id::new()))).unwrap();
        assert_eq!(order.order_type, OrderType::DirectBooking);
    }

    #[test]
    fn test_type_must_match_pro() {
        let mut d = draft(Some(Id::new()));
        d.order_type = Some(OrderType::QuickMatch);
        assert!(Order::place(d).is_err());

        let mut d = draft(None);
        d.order_type = Some(OrderType::DirectBooking);
        assert!(Order::place(d).is_err());
    }

    #[test]
    fn test_validation() {
        let mut d = draft(None);
        d.game_count = 0;
        assert!(Order::place(d).unwrap_err().is_validation());

        let mut d = draft(None);
        d.discord_username = "   ".to_string();
        assert!(Order::place(d).unwrap_err().is_validation());

        let mut d = draft(None);
        d.customer_id = Id::nil();
        assert!(Order::place(d).unwrap_err().is_validation());

        let mut d = draft(None);
        d.pro_id = Some(d.customer_id);
        assert!(Order::place(d).is_err());
    }

    #[test]
    fn test_single_claim() {
        let mut order = Order::place(draft(None)).unwrap();
        let a = Id::new();
        let b = Id::new();

        assert!(order.accept(a));
        assert!(!order.accept(b));
        assert_eq!(order.pro_id, Some(a));
        assert_eq!(order.status, OrderStatus::Accepted);
    }

    #[test]
    fn test_direct_booking_only_claimable_by_its_pro() {
        let pro = Id::new();
        let order = Order::place(draft(Some(pro))).unwrap();
        assert!(order.is_claimable_by(pro));
        assert!(!order.is_claimable_by(Id::new()));
    }

    #[test]
    fn test_lifecycle() {
        let mut order = Order::place(draft(None)).unwrap();
        assert!(!order.complete());
        assert!(order.accept(Id::new()));
        assert!(order.complete());
        assert!(order.completed_at.is_some());
        assert!(!order.cancel());
    }

    #[test]
    fn test_cancel_from_pending_and_accepted() {
        let mut pending = Order::place(draft(None)).unwrap();
        assert!(pending.cancel());
        assert!(pending.cancelled_at.is_some());

        let mut accepted = Order::place(draft(None)).unwrap();
        accepted.accept(Id::new());
        assert!(accepted.cancel());
    }

    #[test]
    fn test_force_status_allows_back_edges() {
        let mut order = Order::place(draft(None)).unwrap();
        order.accept(Id::new());
        order.complete();
        order.force_status(OrderStatus::Pending);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_status_parse_aliases() {
        assert_eq!(OrderStatus::parse("accepted"), Some(OrderStatus::Accepted));
        assert_eq!(OrderStatus::parse("confirmed"), Some(OrderStatus::Accepted));
        assert_eq!(OrderStatus::parse("in_progress"), Some(OrderStatus::Accepted));
        assert_eq!(OrderStatus::parse("open"), None);
        assert!(OrderStatus::is_legacy_alias("confirmed"));
        assert!(!OrderStatus::is_legacy_alias("accepted"));
    }

    #[test]
    fn test_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
        assert!(!Accepted.is_terminal());
        assert!(Accepted.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Accepted));
    }

    #[test]
    fn test_order_type_serde() {
        let json = serde_json::to_string(&OrderType::QuickMatch).unwrap();
        assert_eq!(json, "\"quick-match\"");
        let parsed: OrderType = serde_json::from_str("\"direct-booking\"").unwrap();
        assert_eq!(parsed, OrderType::DirectBooking);
    }
}
