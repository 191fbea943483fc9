use std::sync::Arc;
use uuid::Uuid;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, UserError};
use crate::providers::TokenProvider;
use crate::stores::CredentialStore;
use crate::types::db::user;
use crate::types::internal::{DirectoryAssertion, Identity};

/// Orchestrates both sign-in flows and bearer-token identification
pub struct LoginCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
}

impl LoginCoordinator {
    /// Create LoginCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        let token_provider = Arc::new(TokenProvider::new(
            app_data.secret_manager.clone(),
            app_data.token_ttl_minutes,
        ));

        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider,
        }
    }

    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Email/password login
    ///
    /// # Returns
    /// * `Ok((token, user))` - Freshly minted token and the signed-in user
    /// * `Err(CredentialError::AccountNotFound)` - Unknown email
    /// * `Err(CredentialError::AccountInactive)` - Soft-deleted account
    /// * `Err(CredentialError::InvalidCredentials)` - Wrong password
    pub async fn authenticate_local(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, user::Model), InternalError> {
        let user = self
            .credential_store
            .verify_credentials(email, password)
            .await
            .inspect_err(|e| tracing::info!("Local login rejected for {}: {}", email, e))?;

        let token = self.token_provider.generate_jwt(&user.id)?;
        tracing::info!("User {} logged in", user.id);

        Ok((token, user))
    }

    /// Login with an assertion from the directory's interactive flow
    ///
    /// Unknown accounts are created as directory-origin users. When the
    /// assertion carries no object id, a generated id stands in for it.
    /// A soft-deleted account is refused, as with local login.
    pub async fn authenticate_directory_assertion(
        &self,
        assertion: DirectoryAssertion,
    ) -> Result<(String, user::Model), InternalError> {
        let email = assertion.username.trim();
        if email.is_empty() {
            return Err(UserError::validation("Directory account username is required").into());
        }

        let mut existing = self.credential_store.find_by_email(email).await?;
        if existing.is_none() {
            if let Some(external_id) = assertion.external_id.as_deref() {
                existing = self.credential_store.find_by_external_id(external_id).await?;
            }
        }

        let user = match existing {
            Some(user) if !user.is_active => {
                tracing::info!("Directory login rejected for inactive user {}", user.id);
                return Err(CredentialError::AccountInactive.into());
            }
            Some(user) => user,
            None => {
                let external_id = assertion
                    .external_id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let name = assertion
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| email.to_string());

                let user = self
                    .credential_store
                    .create_directory_user(name, email.to_string(), external_id)
                    .await?;
                tracing::info!("Created directory user {} on first login", user.id);
                user
            }
        };

        let token = self.token_provider.generate_jwt(&user.id)?;

        Ok((token, user))
    }

    /// Resolve a bearer token to the current state of its user
    ///
    /// # Errors
    /// * `CredentialError::ExpiredToken` / `InvalidToken` - Token rejected
    /// * `CredentialError::InvalidToken` - Subject no longer exists
    /// * `CredentialError::AccountInactive` - Subject was soft-deleted
    pub async fn identify(&self, token: &str) -> Result<Identity, InternalError> {
        let claims = self.token_provider.validate_jwt(token)?;

        let user = self
            .credential_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| CredentialError::invalid_token("subject no longer exists"))?;

        if !user.is_active {
            return Err(CredentialError::AccountInactive.into());
        }

        Ok(Identity { user, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_user, setup_test_app_data};

    fn assertion(username: &str, external_id: Option<&str>) -> DirectoryAssertion {
        DirectoryAssertion {
            username: username.to_string(),
            name: Some("Directory Person".to_string()),
            external_id: external_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_authenticate_local_and_identify() {
        let app_data = setup_test_app_data().await;
        let user = app_data
            .credential_store
            .create_user(new_user("Alice", "alice@example.com", "password"))
            .await
            .unwrap();
        let coordinator = LoginCoordinator::new(app_data);

        let (token, logged_in) = coordinator
            .authenticate_local("alice@example.com", "password")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let identity = coordinator.identify(&token).await.unwrap();
        assert_eq!(identity.user_id(), user.id);
        assert_eq!(identity.claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_local_rejections() {
        let app_data = setup_test_app_data().await;
        let user = app_data
            .credential_store
            .create_user(new_user("Alice", "alice@example.com", "password"))
            .await
            .unwrap();
        let credential_store = app_data.credential_store.clone();
        let coordinator = LoginCoordinator::new(app_data);

        match coordinator.authenticate_local("alice@example.com", "nope").await {
            Err(InternalError::Credential(CredentialError::InvalidCredentials)) => {}
            _ => panic!("Expected InvalidCredentials error"),
        }

        credential_store.set_active(&user.id, false).await.unwrap();
        match coordinator.authenticate_local("alice@example.com", "password").await {
            Err(InternalError::Credential(CredentialError::AccountInactive)) => {}
            _ => panic!("Expected AccountInactive error"),
        }
    }

    #[tokio::test]
    async fn test_identify_rejects_deactivated_and_deleted_users() {
        let app_data = setup_test_app_data().await;
        let credential_store = app_data.credential_store.clone();
        let user = credential_store
            .create_user(new_user("Bob", "bob@example.com", "password"))
            .await
            .unwrap();
        let coordinator = LoginCoordinator::new(app_data);
        let (token, _) = coordinator
            .authenticate_local("bob@example.com", "password")
            .await
            .unwrap();

        credential_store.set_active(&user.id, false).await.unwrap();
        match coordinator.identify(&token).await {
            Err(InternalError::Credential(CredentialError::AccountInactive)) => {}
            _ => panic!("Expected AccountInactive error"),
        }

        credential_store.delete(&user.id).await.unwrap();
        match coordinator.identify(&token).await {
            Err(InternalError::Credential(CredentialError::InvalidToken { .. })) => {}
            _ => panic!("Expected InvalidToken error"),
        }
    }

    #[tokio::test]
    async fn test_directory_assertion_creates_then_reuses_user() {
        let app_data = setup_test_app_data().await;
        let credential_store = app_data.credential_store.clone();
        let coordinator = LoginCoordinator::new(app_data);

        let (_token, created) = coordinator
            .authenticate_directory_assertion(assertion("dee@corp.example", Some("oid-9")))
            .await
            .unwrap();
        assert!(created.is_directory_user);
        assert_eq!(created.external_id.as_deref(), Some("oid-9"));
        assert_eq!(created.name, "Directory Person");

        let (_token, again) = coordinator
            .authenticate_directory_assertion(assertion("dee@corp.example", Some("oid-9")))
            .await
            .unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(credential_store.all_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_directory_assertion_generates_external_id() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data);

        let (_token, user) = coordinator
            .authenticate_directory_assertion(assertion("eve@corp.example", None))
            .await
            .unwrap();

        assert!(user.is_directory_user);
        assert!(user.external_id.is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn test_directory_assertion_signs_in_existing_local_user() {
        let app_data = setup_test_app_data().await;
        let local = app_data
            .credential_store
            .create_user(new_user("Fay", "fay@corp.example", "password"))
            .await
            .unwrap();
        let coordinator = LoginCoordinator::new(app_data);

        let (_token, user) = coordinator
            .authenticate_directory_assertion(assertion("fay@corp.example", Some("oid-f")))
            .await
            .unwrap();

        assert_eq!(user.id, local.id);
        assert!(!user.is_directory_user);
    }

    #[tokio::test]
    async fn test_directory_assertion_refuses_soft_deleted_user() {
        let app_data = setup_test_app_data().await;
        let credential_store = app_data.credential_store.clone();
        let coordinator = LoginCoordinator::new(app_data);
        let (_, user) = coordinator
            .authenticate_directory_assertion(assertion("gus@corp.example", Some("oid-g")))
            .await
            .unwrap();

        credential_store.set_active(&user.id, false).await.unwrap();

        // Found by email and by external id alike
        for username in ["gus@corp.example", "renamed@corp.example"] {
            match coordinator
                .authenticate_directory_assertion(assertion(username, Some("oid-g")))
                .await
            {
                Err(InternalError::Credential(CredentialError::AccountInactive)) => {}
                _ => panic!("Expected AccountInactive error"),
            }
        }
    }
}
