//! Database connection pool management

mod migrate;
mod postgres;

pub use migrate::{migrations_dir, run_migrations};
pub use postgres::{create_pool, create_pool_from_env, PoolConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
