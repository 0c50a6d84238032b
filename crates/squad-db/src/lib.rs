//! # squad-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `squad-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers (legacy status names are normalised here)
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use squad_db::{create_pool, run_migrations, PgOrderRepository, PoolConfig};
//! use squad_core::traits::OrderRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let orders = PgOrderRepository::new(pool);
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgChatMessageRepository, PgChatRoomRepository, PgGameProfileRepository, PgGameRepository,
    PgNotificationRepository, PgOrderRepository, PgProfileRepository, PgReviewRepository,
};
