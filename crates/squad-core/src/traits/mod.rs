//! Ports implemented by the infrastructure crates

mod ports;
mod repositories;

pub use ports::{DeclinedOrderStore, EventPublisher, NoopPublisher};
pub use repositories::*;
