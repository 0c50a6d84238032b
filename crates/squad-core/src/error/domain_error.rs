//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::OrderStatus;
use crate::value_objects::Id;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Profile not found: {0}")]
    ProfileNotFound(Id),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(Id),

    #[error("Chat room not found: {0}")]
    ChatRoomNotFound(Id),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Id),

    #[error("Review not found: {0}")]
    ReviewNotFound(Id),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid user ID provided")]
    InvalidUserId,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Requires {0} account")]
    RoleRequired(&'static str),

    #[error("Not a participant of this order")]
    NotParticipant,

    #[error("Only the order's customer may do this")]
    NotOrderCustomer,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Order is no longer available")]
    OrderNotClaimable,

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Chat room is closed")]
    ChatRoomClosed,

    #[error("Profile already exists")]
    ProfileExists,

    #[error("Only completed orders can be reviewed (order is {0})")]
    OrderNotReviewable(OrderStatus),

    #[error("Order has already been reviewed")]
    ReviewExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::GameNotFound(_) => "UNKNOWN_GAME",
            Self::OrderNotFound(_) => "UNKNOWN_ORDER",
            Self::ChatRoomNotFound(_) => "UNKNOWN_CHAT_ROOM",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::ReviewNotFound(_) => "UNKNOWN_REVIEW",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUserId => "INVALID_USER_ID",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::RoleRequired(_) => "ROLE_REQUIRED",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotOrderCustomer => "NOT_ORDER_CUSTOMER",

            // Conflict
            Self::OrderNotClaimable => "ORDER_NOT_CLAIMABLE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ChatRoomClosed => "CHAT_ROOM_CLOSED",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::OrderNotReviewable(_) => "ORDER_NOT_REVIEWABLE",
            Self::ReviewExists => "REVIEW_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound(_)
                | Self::GameNotFound(_)
                | Self::OrderNotFound(_)
                | Self::ChatRoomNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::ReviewNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidUserId | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::RoleRequired(_) | Self::NotParticipant | Self::NotOrderCustomer
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::OrderNotClaimable
                | Self::InvalidTransition { .. }
                | Self::ChatRoomClosed
                | Self::ProfileExists
                | Self::OrderNotReviewable(_)
                | Self::ReviewExists
        )
    }
}
