//! # squad-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    average_rating, AccountType, ApplicationStatus, ChatMessage, ChatRoom, ChatRoomStatus, Game,
    GameProfile, Notification, NotificationType, Order, OrderDraft, OrderStatus, OrderType,
    Profile, Review,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    ChatMessageRepository, ChatRoomRepository, DeclinedOrderStore, EventPublisher,
    GameProfileRepository, GameRepository, MessagePage, NoopPublisher, NotificationRepository,
    OrderQuery, OrderRepository, ProfileRepository, RepoResult, ReviewRepository, StatusCount,
};
pub use value_objects::{slugify, Id, IdParseError, Money, OrderNumber};
