//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AccountType, ChatMessage, ChatRoom, ChatRoomStatus, Game, GameProfile, Notification, Order,
    OrderStatus, Profile, Review,
};
use crate::error::DomainError;
use crate::value_objects::Id;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Profile>>;

    /// Fetch several profiles at once (missing ids are skipped)
    async fn find_many(&self, ids: &[Id]) -> RepoResult<Vec<Profile>>;

    /// Create a new profile
    async fn create(&self, profile: &Profile) -> RepoResult<()>;

    /// Update an existing profile
    async fn update(&self, profile: &Profile) -> RepoResult<()>;

    /// IDs of every profile with the given account type
    async fn list_ids_by_account_type(&self, account_type: AccountType) -> RepoResult<Vec<Id>>;
}

// ============================================================================
// Game Repository
// ============================================================================

#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Game>>;

    /// Case-insensitive lookup by display name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Game>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>>;

    /// All games ordered by name
    async fn list(&self) -> RepoResult<Vec<Game>>;

    async fn create(&self, game: &Game) -> RepoResult<()>;
}

// ============================================================================
// Order Repository
// ============================================================================

/// Filters for order listings. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub customer_id: Option<Id>,
    pub pro_id: Option<Id>,
    pub status: Option<OrderStatus>,
    /// Only orders without a pro
    pub unclaimed: bool,
    pub limit: i64,
    pub offset: i64,
}

impl OrderQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Pending quick matches nobody has claimed yet
    pub fn available() -> Self {
        Self {
            status: Some(OrderStatus::Pending),
            unclaimed: true,
            limit: Self::DEFAULT_LIMIT,
            ..Self::default()
        }
    }
}

/// Order count for one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find order by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Order>>;

    /// Insert a new order
    async fn create(&self, order: &Order) -> RepoResult<()>;

    /// List orders matching a query
    async fn list(&self, query: &OrderQuery) -> RepoResult<Vec<Order>>;

    /// Per-status totals across all orders
    async fn count_by_status(&self) -> RepoResult<Vec<StatusCount>>;

    /// Claim a pending order for `pro_id`.
    ///
    /// Atomic conditional update: succeeds only while the order is pending
    /// and has no pro (or is already bound to this pro). Returns whether a
    /// row was changed, so exactly one of several racing callers sees `true`.
    async fn accept(&self, id: Id, pro_id: Id) -> RepoResult<bool>;

    /// Move an order to `to` only if its current status is one of `from`.
    /// Stamps `completed_at`/`cancelled_at` as appropriate.
    async fn transition(&self, id: Id, from: &[OrderStatus], to: OrderStatus) -> RepoResult<bool>;

    /// Unconditionally set the status (staff override)
    async fn set_status(&self, id: Id, status: OrderStatus) -> RepoResult<bool>;
}

// ============================================================================
// Chat Repositories
// ============================================================================

#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<ChatRoom>>;

    /// The room belonging to an order, if one was created
    async fn find_by_order(&self, order_id: Id) -> RepoResult<Option<ChatRoom>>;

    /// Rooms the user takes part in, most recently active first
    async fn list_for_user(&self, user_id: Id) -> RepoResult<Vec<ChatRoom>>;

    /// Insert the room unless the order already has one.
    /// Returns the stored room and whether it was created by this call.
    async fn create_if_absent(&self, room: &ChatRoom) -> RepoResult<(ChatRoom, bool)>;

    async fn set_status(&self, id: Id, status: ChatRoomStatus) -> RepoResult<bool>;

    /// Bump `updated_at`
    async fn touch(&self, id: Id) -> RepoResult<()>;
}

/// Page selector for chat history. Page 0 holds the newest messages.
#[derive(Debug, Clone, Copy)]
pub struct MessagePage {
    pub page: i64,
    pub page_size: i64,
    pub include_archived: bool,
}

impl MessagePage {
    pub const DEFAULT_PAGE_SIZE: i64 = 50;

    pub fn offset(&self) -> i64 {
        self.page.max(0) * self.page_size
    }
}

impl Default for MessagePage {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: Self::DEFAULT_PAGE_SIZE,
            include_archived: false,
        }
    }
}

#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    async fn create(&self, message: &ChatMessage) -> RepoResult<()>;

    /// One page of messages, newest first
    async fn list_page(&self, chat_room_id: Id, page: MessagePage) -> RepoResult<Vec<ChatMessage>>;

    async fn count(&self, chat_room_id: Id, include_archived: bool) -> RepoResult<i64>;

    /// Mark every unread message from `sender_id` in the room as read
    async fn mark_read_from(&self, chat_room_id: Id, sender_id: Id) -> RepoResult<u64>;

    /// Unread messages addressed to the user across all their rooms
    async fn count_unread_for(&self, user_id: Id) -> RepoResult<i64>;

    /// Archive messages older than `cutoff` in closed rooms
    async fn archive_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Notification>>;

    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Insert a batch in one statement
    async fn create_many(&self, notifications: &[Notification]) -> RepoResult<u64>;

    /// Newest first
    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        limit: i64,
    ) -> RepoResult<Vec<Notification>>;

    async fn count_unread(&self, user_id: Id) -> RepoResult<i64>;

    /// Mark one notification read; false when it does not belong to the user
    async fn mark_read(&self, id: Id, user_id: Id) -> RepoResult<bool>;

    async fn mark_all_read(&self, user_id: Id) -> RepoResult<u64>;

    async fn delete(&self, id: Id, user_id: Id) -> RepoResult<bool>;
}

// ============================================================================
// Review Repository
// ============================================================================

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Review>>;

    /// Insert a review. Fails with `ReviewExists` when the order already has one.
    async fn create(&self, review: &Review) -> RepoResult<()>;

    /// Reviews about one profile, newest first
    async fn list_for_reviewee(&self, reviewee_id: Id, limit: i64) -> RepoResult<Vec<Review>>;

    /// Every review, newest first (staff moderation)
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Review>>;

    async fn delete(&self, id: Id) -> RepoResult<bool>;
}

// ============================================================================
// Game Profile Repository
// ============================================================================

#[async_trait]
pub trait GameProfileRepository: Send + Sync {
    async fn find(&self, profile_id: Id, game_id: Id) -> RepoResult<Option<GameProfile>>;

    async fn list_for_profile(&self, profile_id: Id) -> RepoResult<Vec<GameProfile>>;

    /// Insert or replace the row for `(profile_id, game_id)`
    async fn upsert(&self, game_profile: &GameProfile) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_page_offset() {
        let page = MessagePage {
            page: 2,
            ..MessagePage::default()
        };
        assert_eq!(page.offset(), 100);

        let negative = MessagePage {
            page: -1,
            ..MessagePage::default()
        };
        assert_eq!(negative.offset(), 0);
    }

    #[test]
    fn test_available_query() {
        let query = OrderQuery::available();
        assert_eq!(query.status, Some(OrderStatus::Pending));
        assert!(query.unclaimed);
        assert!(query.pro_id.is_none());
    }
}
