//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AdminOrdersQuery, CreateOrderRequest, CreateReviewRequest, ListOrdersQuery, MessagesQuery,
    NotificationsQuery, ReviewApplicationRequest, ReviewsQuery, SendMessageRequest,
    UpdateGameProfileRequest, UpdateOrderStatusRequest, UpsertProfileRequest,
};

pub use responses::{
    AcceptOrderResponse, AdminOrdersResponse, ArchiveResponse, ChatMessageResponse,
    ChatRoomResponse, CountResponse, GameProfileResponse, GameResponse, HealthChecks,
    HealthResponse, MarkReadResponse, MessagePageResponse, NotificationResponse,
    OrderDetailResponse, OrderResponse, ProfileResponse, ProfileReviewsResponse, ProfileSummary,
    ReadinessResponse, ReviewResponse, StatusCountResponse,
};
