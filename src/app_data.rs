use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::{BootstrapSettings, SecretManager};
use crate::errors::InternalError;
use crate::providers::{DirectoryConnector, GraphConnector};
use crate::stores::{ApiLogStore, CredentialStore, DirectoryConfigStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ directory_config_store (Arc<DirectoryConfigStore>)
///   ├─ api_log_store (Arc<ApiLogStore>)
///   └─ directory_connector (Arc<dyn DirectoryConnector>)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ LoginCoordinator::new(app_data)
///   ├─ UserCoordinator::new(app_data)
///   └─ DirectoryCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub token_ttl_minutes: i64,
    pub credential_store: Arc<CredentialStore>,
    pub directory_config_store: Arc<DirectoryConfigStore>,
    pub api_log_store: Arc<ApiLogStore>,
    pub directory_connector: Arc<dyn DirectoryConnector>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret loading or HTTP client construction fails
    pub async fn init(
        db: DatabaseConnection,
        settings: &BootstrapSettings,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?);

        let directory_connector: Arc<dyn DirectoryConnector> = Arc::new(GraphConnector::new(
            settings.directory_authority_url(),
            settings.directory_graph_url(),
            settings.directory_timeout(),
        )?);

        let app_data = Self::from_parts(
            db,
            secret_manager,
            settings.token_ttl_minutes(),
            directory_connector,
        );

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Build AppData from already constructed pieces
    pub fn from_parts(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        token_ttl_minutes: i64,
        directory_connector: Arc<dyn DirectoryConnector>,
    ) -> Self {
        tracing::debug!("Creating stores...");
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secret_manager.password_pepper().to_string(),
        ));
        let directory_config_store = Arc::new(DirectoryConfigStore::new(db.clone()));
        let api_log_store = Arc::new(ApiLogStore::new(db.clone()));
        tracing::debug!("Stores created");

        Self {
            db,
            secret_manager,
            token_ttl_minutes,
            credential_store,
            directory_config_store,
            api_log_store,
            directory_connector,
        }
    }
}
