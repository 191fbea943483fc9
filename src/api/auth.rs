use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};
use std::sync::Arc;

use crate::api::helpers::record_outcome;
use crate::app_data::AppData;
use crate::coordinators::{LoginCoordinator, UserCoordinator};
use crate::errors::ApiError;
use crate::types::dto::auth::{DirectoryLoginRequest, LoginRequest, LoginResponse};
use crate::types::dto::user::{CreateAdminRequest, UserEnvelope};
use crate::types::internal::ResponseSummary;

/// Public sign-in and bootstrap endpoints
pub struct AuthApi {
    login_coordinator: Arc<LoginCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>, login_coordinator: Arc<LoginCoordinator>) -> Self {
        Self {
            login_coordinator,
            user_coordinator: Arc::new(UserCoordinator::new(app_data)),
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/users")]
impl AuthApi {
    /// Login with email and password
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, ApiError> {
        let result = self
            .login_coordinator
            .authenticate_local(body.email.trim(), &body.password)
            .await
            .map(|(token, user)| {
                Json(LoginResponse {
                    success: true,
                    msg: "Login successful".to_string(),
                    token,
                    user: user.into(),
                })
            })
            .map_err(ApiError::from);

        record_outcome(req, result, |_| ResponseSummary::ok("Login successful"))
    }

    /// Login with an account already verified by the directory's interactive flow
    #[oai(
        path = "/loginDirectoryUser",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn login_directory_user(
        &self,
        req: &Request,
        body: Json<DirectoryLoginRequest>,
    ) -> Result<Json<LoginResponse>, ApiError> {
        let result = self
            .login_coordinator
            .authenticate_directory_assertion(body.0.into())
            .await
            .map(|(token, user)| {
                Json(LoginResponse {
                    success: true,
                    msg: "Login successful".to_string(),
                    token,
                    user: user.into(),
                })
            })
            .map_err(ApiError::from);

        record_outcome(req, result, |_| ResponseSummary::ok("Directory login successful"))
    }

    /// Create the first admin account. Fails once an admin exists.
    #[oai(path = "/create-admin", method = "post", tag = "AuthTags::Authentication")]
    async fn create_admin(
        &self,
        req: &Request,
        body: Json<CreateAdminRequest>,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let result = self
            .user_coordinator
            .create_admin(body.0.into())
            .await
            .map(|admin| Json(UserEnvelope::new("Admin user created successfully.", admin)))
            .map_err(ApiError::from);

        record_outcome(req, result, |_| ResponseSummary::ok("Admin user created"))
    }
}
