//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod chat;
pub mod games;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod profiles;
pub mod reviews;
