//! Schema migrations
//!
//! Migrations are read from disk at runtime (`SQUAD_MIGRATIONS_DIR`, or the
//! crate's `migrations/` directory).

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::info;

/// Directory holding the `*.sql` migration files
pub fn migrations_dir() -> PathBuf {
    std::env::var("SQUAD_MIGRATIONS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"))
}

/// Apply every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.clone()).await?;
    migrator.run(pool).await?;
    info!(dir = %dir.display(), "Database migrations applied");
    Ok(())
}
