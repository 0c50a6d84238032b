//! Connection management
//!
//! Tracks live WebSocket connections and which user each belongs to.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;
