use poem::Request;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};
use std::sync::Arc;

use crate::api::access_control::{ADMIN_ONLY, ANY_ROLE, AccessControl};
use crate::api::helpers::record_outcome;
use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::errors::ApiError;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    CreateUserRequest, OriginDto, UpdateUserRequest, UserEnvelope, UserListResponse,
};
use crate::types::internal::{ResponseSummary, UserFilter, UserUpdate};

/// User management endpoints
pub struct UsersApi {
    user_coordinator: Arc<UserCoordinator>,
    access_control: Arc<AccessControl>,
}

impl UsersApi {
    pub fn new(app_data: Arc<AppData>, access_control: Arc<AccessControl>) -> Self {
        Self {
            user_coordinator: Arc::new(UserCoordinator::new(app_data)),
            access_control,
        }
    }

    async fn update(
        &self,
        req: &Request,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let actor = self.access_control.authenticate(req).await?;

        // Self-service covers name, email and password only
        if actor.user_id() != user_id || update.touches_privileges() {
            AccessControl::authorize(&actor, ADMIN_ONLY)?;
        }

        let user = self
            .user_coordinator
            .update_user(&actor, user_id, update)
            .await?;
        Ok(Json(UserEnvelope::new("User updated successfully", user)))
    }
}

#[derive(Tags)]
enum UserTags {
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// Profile of the authenticated user
    #[oai(path = "/me", method = "get", tag = "UserTags::Users")]
    async fn me(&self, req: &Request) -> Result<Json<UserEnvelope>, ApiError> {
        let result = async {
            let identity = self.access_control.require(req, ANY_ROLE).await?;
            Ok::<_, ApiError>(Json(UserEnvelope::new("User fetched", identity.user)))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("Profile fetched"))
    }

    /// Create a local account (admin only)
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let user = self.user_coordinator.create_user(body.0.into()).await?;
            Ok::<_, ApiError>(Json(UserEnvelope::new("User created successfully", user)))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("User created"))
    }

    /// List users (admin only)
    ///
    /// All filters are optional and combined with AND. `search` matches name
    /// or email, case-insensitively.
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        req: &Request,
        origin: Query<Option<OriginDto>>,
        active: Query<Option<bool>>,
        search: Query<Option<String>>,
    ) -> Result<Json<UserListResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let filter = UserFilter {
                origin: origin.0.map(Into::into),
                active: active.0,
                search: search.0,
            };
            let users = self.user_coordinator.list_users(filter).await?;
            Ok::<_, ApiError>(Json(UserListResponse::from(users)))
        }
        .await;

        record_outcome(req, result, |list| {
            ResponseSummary::ok("Users fetched").with_count(list.data.len())
        })
    }

    /// Update a user
    ///
    /// Users may change their own name, email and password. Everything else requires admin.
    #[oai(path = "/:user_id/update", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        user_id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let result = self.update(req, &user_id.0, body.0.into()).await;

        record_outcome(req, result, |_| ResponseSummary::ok("User updated"))
    }

    /// Soft-delete a user (admin only)
    #[oai(path = "/:user_id/delete", method = "put", tag = "UserTags::Users")]
    async fn soft_delete(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let result = async {
            let actor = self.access_control.require(req, ADMIN_ONLY).await?;
            let user = self.user_coordinator.soft_delete(&actor, &user_id.0).await?;
            Ok::<_, ApiError>(Json(UserEnvelope::new("User deleted successfully", user)))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("User deactivated"))
    }

    /// Reactivate a soft-deleted user (admin only)
    #[oai(path = "/:user_id/undo_delete", method = "put", tag = "UserTags::Users")]
    async fn undo_delete(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<UserEnvelope>, ApiError> {
        let result = async {
            let actor = self.access_control.require(req, ADMIN_ONLY).await?;
            let user = self.user_coordinator.undo_delete(&actor, &user_id.0).await?;
            Ok::<_, ApiError>(Json(UserEnvelope::new("User restored successfully", user)))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("User reactivated"))
    }

    /// Permanently remove a user (admin only)
    #[oai(path = "/:user_id/hard_delete", method = "delete", tag = "UserTags::Users")]
    async fn hard_delete(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let result = async {
            let actor = self.access_control.require(req, ADMIN_ONLY).await?;
            self.user_coordinator.hard_delete(&actor, &user_id.0).await?;
            Ok::<_, ApiError>(Json(MessageResponse::ok("User permanently deleted")))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("User permanently deleted"))
    }
}
