use crate::config::{BootstrapSettings, connect_database, migrate_database};

/// Run database migrations without initializing AppData
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}
