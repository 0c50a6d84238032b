//! Model to entity mappers
//!
//! Rows are converted with `TryFrom<Model>`: text enum columns that fail to
//! parse surface as `DomainError::DatabaseError` instead of panicking.

mod chat;
mod game;
mod notification;
mod order;
mod profile;
mod review;

pub use order::{status_filter, status_names};

use squad_core::DomainError;

/// Error for a text column holding an unknown enum value
pub(crate) fn corrupt_column(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("unexpected {column} value: {value}"))
}
