//! Schema migrations, applied at runtime from the crate's `migrations/` dir

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply every pending migration in `dir` (defaults to [`MIGRATIONS_DIR`])
pub async fn run_migrations(pool: &PgPool, dir: Option<&Path>) -> Result<(), MigrateError> {
    let dir = dir.unwrap_or_else(|| Path::new(MIGRATIONS_DIR));
    let migrator = Migrator::new(dir).await?;
    info!(path = %dir.display(), count = migrator.iter().count(), "Applying database migrations");
    migrator.run(pool).await
}
