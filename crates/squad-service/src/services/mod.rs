//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and owns one slice of
//! the marketplace: profiles, the catalog, orders, chat, notifications,
//! reviews and the staff dashboard.

pub mod access;
pub mod admin;
pub mod chat;
pub mod context;
pub mod error;
pub mod game;
pub mod game_profile;
pub mod notification;
pub mod order;
pub mod profile;
pub mod review;

#[cfg(test)]
mod testing;


pub use access::AccessService;
pub use admin::AdminService;
pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use game::GameService;
pub use game_profile::GameProfileService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use profile::ProfileService;
pub use review::ReviewService;
