use crate::config::BootstrapSettings;
use crate::config::database::{init_database, migrate_database};

/// Run database migrations
///
/// Connects and migrates without initializing the full AppData structure.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
