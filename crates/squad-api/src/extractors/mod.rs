//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation and typed path/query
//! parameters. All of them reject with [`ApiError`](crate::response::ApiError).

mod auth;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use path::PathParams;
pub use query::QueryParams;
pub use validated::ValidatedJson;
