//! # squad-gateway
//!
//! WebSocket gateway that pushes order, chat and notification events to
//! connected users.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
