//! Domain entities - core business objects

mod chat;
mod game;
mod game_profile;
mod notification;
mod order;
mod profile;
mod review;

pub use chat::{ChatMessage, ChatRoom, ChatRoomStatus};
pub use game::Game;
pub use game_profile::GameProfile;
pub use notification::{Notification, NotificationType};
pub use order::{Order, OrderDraft, OrderStatus, OrderType};
pub use profile::{AccountType, ApplicationStatus, Profile};
pub use review::{average_rating, Review};
