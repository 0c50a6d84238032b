//! Redis Pub/Sub to WebSocket fan-out

mod dispatcher;

pub use dispatcher::{route_message, EventDispatcher};
