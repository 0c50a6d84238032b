//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in squad-core.
//! Each repository handles database operations for a specific domain entity.

mod chat_message;
mod chat_room;
mod error;
mod game;
mod game_profile;
mod notification;
mod order;
mod profile;
mod review;

pub use chat_message::PgChatMessageRepository;
pub use chat_room::PgChatRoomRepository;
pub use game::PgGameRepository;
pub use game_profile::PgGameProfileRepository;
pub use notification::PgNotificationRepository;
pub use order::PgOrderRepository;
pub use profile::PgProfileRepository;
pub use review::PgReviewRepository;
