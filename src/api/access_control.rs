use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};
use std::sync::Arc;

use crate::coordinators::LoginCoordinator;
use crate::errors::internal::CredentialError;
use crate::errors::{ApiError, InternalError};
use crate::types::db::user::Role;
use crate::types::internal::Identity;

/// Roles allowed to run administrative operations
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Any authenticated user
pub const ANY_ROLE: &[Role] = &[Role::User, Role::Admin];

/// Bearer-token authentication and role authorization for every non-public endpoint
pub struct AccessControl {
    login_coordinator: Arc<LoginCoordinator>,
}

impl AccessControl {
    pub fn new(login_coordinator: Arc<LoginCoordinator>) -> Self {
        Self { login_coordinator }
    }

    /// Resolve the caller from `Authorization: Bearer <token>`
    ///
    /// The user row is reloaded on every request; deleted or deactivated users are rejected.
    pub async fn authenticate(&self, req: &Request) -> Result<Identity, ApiError> {
        let bearer = Bearer::from_request(req).map_err(|_| {
            ApiError::from_internal_error(InternalError::from(CredentialError::MissingToken))
        })?;

        let identity = self.login_coordinator.identify(&bearer.token).await?;
        tracing::debug!("Authenticated user {}", identity.user_id());

        Ok(identity)
    }

    /// Fail with 403 unless the identity holds one of `roles`
    pub fn authorize(identity: &Identity, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&identity.role()) {
            return Ok(());
        }

        tracing::info!(
            "User {} with role {} denied access",
            identity.user_id(),
            identity.role()
        );
        Err(ApiError::forbidden(format!(
            "Role : {} - is not authorized to access",
            identity.role()
        )))
    }

    /// Authenticate, then authorize
    pub async fn require(&self, req: &Request, roles: &[Role]) -> Result<Identity, ApiError> {
        let identity = self.authenticate(req).await?;
        Self::authorize(&identity, roles)?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{identity_for, new_user, setup_test_app_data};
    use poem::http::header;

    fn request_with_token(token: &str) -> Request {
        Request::builder()
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .finish()
    }

    #[tokio::test]
    async fn test_authenticate_rejects_missing_and_garbage_tokens() {
        let app_data = setup_test_app_data().await;
        let access = AccessControl::new(Arc::new(LoginCoordinator::new(app_data)));

        let missing = access.authenticate(&Request::builder().finish()).await;
        assert_eq!(missing.unwrap_err().status_code(), 401);

        let garbage = access.authenticate(&request_with_token("garbage")).await;
        let err = garbage.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Unauthorized user");
    }

    #[tokio::test]
    async fn test_authenticate_accepts_valid_token() {
        let app_data = setup_test_app_data().await;
        let user = app_data
            .credential_store
            .create_user(new_user("Ann", "ann@example.com", "password"))
            .await
            .unwrap();
        let login = Arc::new(LoginCoordinator::new(app_data));
        let token = login.token_provider().generate_jwt(&user.id).unwrap();
        let access = AccessControl::new(login);

        let identity = access.authenticate(&request_with_token(&token)).await.unwrap();
        assert_eq!(identity.user_id(), user.id);

        let denied = access.require(&request_with_token(&token), ADMIN_ONLY).await;
        let err = denied.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), "Role : user - is not authorized to access");
    }

    #[tokio::test]
    async fn test_authorize_role_gate() {
        let app_data = setup_test_app_data().await;
        let admin = app_data
            .credential_store
            .claim_admin(crate::types::internal::NewUser {
                role: Role::Admin,
                ..new_user("Root", "root@example.com", "adminpass")
            })
            .await
            .unwrap();
        let admin = identity_for(admin);

        assert!(AccessControl::authorize(&admin, ADMIN_ONLY).is_ok());
        assert!(AccessControl::authorize(&admin, ANY_ROLE).is_ok());
        assert!(AccessControl::authorize(&admin, &[Role::User]).is_err());
    }
}
