use chrono::Utc;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::{DirectoryError, UserError};
use crate::stores::{CredentialStore, DirectoryConfigStore};
use crate::types::internal::{DirectoryIdentity, MatchKey, Resolution, SyncResult};

/// Format of `last_synchronization` and `SyncResult::synchronized_at`
pub const SYNC_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reconciles directory identities with local accounts
///
/// An identity matches a local user by external id or by email. Matched users
/// are never modified; unmatched identities become new directory-origin users.
pub struct ReconciliationProvider {
    credential_store: Arc<CredentialStore>,
    config_store: Arc<DirectoryConfigStore>,
}

impl ReconciliationProvider {
    pub fn new(
        credential_store: Arc<CredentialStore>,
        config_store: Arc<DirectoryConfigStore>,
    ) -> Self {
        Self {
            credential_store,
            config_store,
        }
    }

    /// Two-key resolution of one identity
    ///
    /// # Errors
    /// * `UserError::Validation` - Identity has neither mail nor principal name
    /// * `UserError::DuplicateEmail` - Lost a race with a concurrent insert
    pub async fn resolve(&self, identity: &DirectoryIdentity) -> Result<Resolution, InternalError> {
        let email = identity
            .email()
            .ok_or_else(|| UserError::validation("Directory identity has no email"))?;

        let by_external_id = self.credential_store.find_by_external_id(&identity.id).await?;
        let by_email = self.credential_store.find_by_email(email).await?;

        let resolution = match (by_external_id, by_email) {
            (Some(user), Some(other)) => {
                let matched_by = if user.id == other.id {
                    MatchKey::Both
                } else {
                    tracing::warn!(
                        "Directory identity {} matches user {} by external id and user {} by email",
                        identity.id,
                        user.id,
                        other.id
                    );
                    MatchKey::ExternalId
                };
                Resolution::Matched { user, matched_by }
            }
            (Some(user), None) => Resolution::Matched {
                user,
                matched_by: MatchKey::ExternalId,
            },
            (None, Some(user)) => Resolution::Matched {
                user,
                matched_by: MatchKey::Email,
            },
            (None, None) => {
                let user = self
                    .credential_store
                    .create_directory_user(identity.name(), email.to_string(), identity.id.clone())
                    .await?;
                Resolution::Created(user)
            }
        };

        Ok(resolution)
    }

    /// Synchronize a directory listing into the local store
    ///
    /// Identities are processed in listing order. Failures on a single
    /// identity are logged and skipped. Users created before a later failure
    /// stay created.
    ///
    /// # Errors
    /// * `DirectoryError::NotConfigured` - No active config to stamp with the sync time
    pub async fn synchronize(
        &self,
        identities: Vec<DirectoryIdentity>,
    ) -> Result<SyncResult, InternalError> {
        if identities.is_empty() {
            tracing::info!("Directory returned no users, nothing to synchronize");
        }

        let mut created_users = Vec::new();

        for identity in &identities {
            if identity.email().is_none() {
                tracing::warn!(
                    "Skipping directory identity {}: no mail or principal name",
                    identity.id
                );
                continue;
            }

            match self.resolve(identity).await {
                Ok(Resolution::Created(user)) => {
                    tracing::info!(
                        "Created local user {} for directory identity {}",
                        user.email,
                        identity.id
                    );
                    created_users.push(user);
                }
                Ok(Resolution::Matched { user, matched_by }) => {
                    tracing::debug!(
                        "Directory identity {} already present as {} ({:?})",
                        identity.id,
                        user.email,
                        matched_by
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to reconcile directory identity {}: {}",
                        identity.id,
                        e
                    );
                }
            }
        }

        let synchronized_at = Utc::now().format(SYNC_TIMESTAMP_FORMAT).to_string();

        match self.config_store.record_sync(&synchronized_at).await {
            Ok(_) => {}
            Err(InternalError::Directory(DirectoryError::NotConfigured)) => {
                tracing::error!(
                    "Sync created {} users but no active directory config exists",
                    created_users.len()
                );
                return Err(DirectoryError::NotConfigured.into());
            }
            Err(e) => {
                tracing::error!("Failed to record directory sync time: {}", e);
            }
        }

        let all_users = self.credential_store.all_users().await?;

        tracing::info!(
            "Directory sync completed: {} of {} identities created",
            created_users.len(),
            identities.len()
        );

        Ok(SyncResult {
            new_users_count: created_users.len(),
            created_users,
            all_users,
            synchronized_at,
        })
    }
}
