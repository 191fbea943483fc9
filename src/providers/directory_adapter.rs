use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::DirectoryError;
use crate::providers::DirectoryConnector;
use crate::stores::DirectoryConfigStore;
use crate::types::internal::{
    DirectoryAccessToken, DirectoryCredentials, DirectoryGroup, DirectoryIdentity,
};

/// Directory client adapter
///
/// Reloads the active DirectoryConfig on every call, so credential changes
/// take effect without a restart.
pub struct DirectoryAdapter {
    config_store: Arc<DirectoryConfigStore>,
    connector: Arc<dyn DirectoryConnector>,
}

impl DirectoryAdapter {
    pub fn new(
        config_store: Arc<DirectoryConfigStore>,
        connector: Arc<dyn DirectoryConnector>,
    ) -> Self {
        Self {
            config_store,
            connector,
        }
    }

    /// True when the settings table exists and an active row carries a client id and secret
    ///
    /// Never fails: lookup errors are logged and reported as not configured.
    pub async fn is_configured(&self) -> bool {
        match self.table_and_credentials().await {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::error!("Failed to read directory configuration: {}", e);
                false
            }
        }
    }

    async fn table_and_credentials(&self) -> Result<Option<DirectoryCredentials>, InternalError> {
        if !self.config_store.table_exists().await? {
            tracing::debug!("Directory config table not present");
            return Ok(None);
        }

        let credentials = self
            .config_store
            .get_active()
            .await?
            .filter(|config| !config.client_id.is_empty() && !config.client_secret.is_empty())
            .map(|config| DirectoryCredentials {
                tenant_id: config.tenant_id,
                client_id: config.client_id,
                client_secret: config.client_secret,
            });

        Ok(credentials)
    }

    /// Credentials of the active config
    ///
    /// # Errors
    /// * `DirectoryError::NotConfigured` - No usable active config
    pub async fn active_credentials(&self) -> Result<DirectoryCredentials, InternalError> {
        self.table_and_credentials()
            .await?
            .ok_or_else(|| DirectoryError::NotConfigured.into())
    }

    /// Whether the active credentials can mint a token. Failures are logged, not raised.
    pub async fn validate_credentials(&self) -> bool {
        match self.active_credentials().await {
            Ok(credentials) => self.credentials_valid(&credentials).await,
            Err(e) => {
                tracing::warn!("Directory credential validation skipped: {}", e);
                false
            }
        }
    }

    /// Whether the given credentials can mint a token
    pub async fn credentials_valid(&self, credentials: &DirectoryCredentials) -> bool {
        match self.connector.mint_access_token(credentials).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "Directory rejected credentials for client {}: {}",
                    credentials.client_id,
                    e
                );
                false
            }
        }
    }

    /// Capability check that hands back the token it minted
    ///
    /// # Errors
    /// * `DirectoryError::NotConfigured` - No usable active config
    /// * `DirectoryError::CredentialsRejected` - The directory refused the credentials
    pub async fn open_session(&self) -> Result<DirectoryAccessToken, InternalError> {
        let credentials = self.active_credentials().await?;
        self.connector
            .mint_access_token(&credentials)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Directory rejected credentials for client {}: {}",
                    credentials.client_id,
                    e
                );
                DirectoryError::CredentialsRejected.into()
            })
    }

    async fn access_token(&self) -> Result<DirectoryAccessToken, InternalError> {
        let credentials = self.active_credentials().await?;
        let token = self
            .connector
            .mint_access_token(&credentials)
            .await
            .map_err(|e| match e {
                DirectoryError::TokenMint(_) => e,
                other => DirectoryError::TokenMint(other.to_string()),
            })?;
        Ok(token)
    }

    pub async fn list_users(&self) -> Result<Vec<DirectoryIdentity>, InternalError> {
        let token = self.access_token().await?;
        self.users_with(&token).await
    }

    pub async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, InternalError> {
        let token = self.access_token().await?;
        self.groups_with(&token).await
    }

    pub async fn list_user_memberships(
        &self,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, InternalError> {
        let token = self.access_token().await?;
        self.memberships_with(&token, external_id).await
    }

    /// User listing with a token from `open_session`
    pub async fn users_with(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryIdentity>, InternalError> {
        let users = self.connector.fetch_users(token).await.inspect_err(|e| {
            tracing::error!("Fetching directory users failed: {}", e);
        })?;
        tracing::debug!("Fetched {} directory users", users.len());
        Ok(users)
    }

    pub async fn groups_with(
        &self,
        token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryGroup>, InternalError> {
        let groups = self.connector.fetch_groups(token).await.inspect_err(|e| {
            tracing::error!("Fetching directory groups failed: {}", e);
        })?;
        Ok(groups)
    }

    pub async fn memberships_with(
        &self,
        token: &DirectoryAccessToken,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, InternalError> {
        let groups = self
            .connector
            .fetch_memberships(token, external_id)
            .await
            .inspect_err(|e| {
                tracing::error!("Fetching memberships of {} failed: {}", external_id, e);
            })?;
        Ok(groups)
    }
}
