//! Gateway events

mod event_types;
mod payloads;

pub use event_types::{GatewayEventType, UnknownEventType};
pub use payloads::ReadyEvent;
