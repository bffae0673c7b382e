use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Apply pending `shared_files` schema migrations
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    info!(known = MIGRATOR.iter().count(), "Applying schema migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}
