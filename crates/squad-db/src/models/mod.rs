//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod game;
mod notification;
mod order;
mod profile;
mod review;

pub use chat::{ChatMessageModel, ChatRoomModel};
pub use game::GameModel;
pub use notification::NotificationModel;
pub use order::{OrderModel, StatusCountModel};
pub use profile::ProfileModel;
pub use review::{GameProfileModel, ReviewModel};
