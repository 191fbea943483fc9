use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{DirectoryError, UserError};
use crate::providers::{DirectoryAdapter, ReconciliationProvider};
use crate::stores::DirectoryConfigStore;
use crate::types::db::directory_config;
use crate::types::internal::{
    DirectoryAccessToken, DirectoryCredentials, DirectoryGroup, DirectoryIdentity, SyncResult,
};

/// Orchestrates directory listings, synchronization and directory settings
///
/// Every directory operation first checks that the directory is configured
/// and that its credentials are accepted.
pub struct DirectoryCoordinator {
    adapter: Arc<DirectoryAdapter>,
    reconciliation_provider: Arc<ReconciliationProvider>,
    config_store: Arc<DirectoryConfigStore>,
}

impl DirectoryCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let adapter = Arc::new(DirectoryAdapter::new(
            app_data.directory_config_store.clone(),
            app_data.directory_connector.clone(),
        ));

        let reconciliation_provider = Arc::new(ReconciliationProvider::new(
            app_data.credential_store.clone(),
            app_data.directory_config_store.clone(),
        ));

        Self {
            adapter,
            reconciliation_provider,
            config_store: app_data.directory_config_store.clone(),
        }
    }

    /// Capability check; the returned token serves the request that follows
    ///
    /// # Errors
    /// * `DirectoryError::NotConfigured` - No usable active config
    /// * `DirectoryError::CredentialsRejected` - The directory refused the credentials
    async fn ensure_available(&self) -> Result<DirectoryAccessToken, InternalError> {
        self.adapter.open_session().await
    }

    pub async fn list_users(&self) -> Result<Vec<DirectoryIdentity>, InternalError> {
        let token = self.ensure_available().await?;
        self.adapter.users_with(&token).await
    }

    pub async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, InternalError> {
        let token = self.ensure_available().await?;
        self.adapter.groups_with(&token).await
    }

    pub async fn list_user_memberships(
        &self,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, InternalError> {
        let token = self.ensure_available().await?;
        self.adapter.memberships_with(&token, external_id).await
    }

    /// Pull the directory user listing and reconcile it with local accounts
    pub async fn synchronize(&self) -> Result<SyncResult, InternalError> {
        let token = self.ensure_available().await?;

        let identities = self.adapter.users_with(&token).await?;
        tracing::info!("Synchronizing {} directory identities", identities.len());

        self.reconciliation_provider.synchronize(identities).await
    }

    pub async fn active_config(&self) -> Result<directory_config::Model, InternalError> {
        self.config_store
            .get_active()
            .await?
            .ok_or_else(|| DirectoryError::NotConfigured.into())
    }

    /// Store new directory credentials as the active config
    ///
    /// The credentials are saved even when the directory rejects them, so a
    /// later fix on the directory side needs no second save.
    pub async fn save_config(
        &self,
        credentials: DirectoryCredentials,
    ) -> Result<directory_config::Model, InternalError> {
        let credentials = DirectoryCredentials {
            tenant_id: credentials.tenant_id.trim().to_string(),
            client_id: credentials.client_id.trim().to_string(),
            client_secret: credentials.client_secret.trim().to_string(),
        };

        if credentials.tenant_id.is_empty()
            || credentials.client_id.is_empty()
            || credentials.client_secret.is_empty()
        {
            return Err(UserError::validation(
                "tenant_id, client_id, and client_secret are required.",
            )
            .into());
        }

        if !self.adapter.credentials_valid(&credentials).await {
            tracing::warn!(
                "Saving directory config for client {} that the directory currently rejects",
                credentials.client_id
            );
        }

        self.config_store.save_config(credentials).await
    }
}
