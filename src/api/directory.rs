use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};
use std::sync::Arc;

use crate::api::access_control::{ADMIN_ONLY, AccessControl};
use crate::api::helpers::record_outcome;
use crate::app_data::AppData;
use crate::coordinators::DirectoryCoordinator;
use crate::errors::ApiError;
use crate::types::dto::directory::{
    DirectoryConfigRequest, DirectoryConfigResponse, DirectoryGroupListResponse,
    DirectoryUserListResponse, SyncResponse,
};
use crate::types::internal::ResponseSummary;

/// Directory integration endpoints, all admin only
pub struct DirectoryApi {
    directory_coordinator: Arc<DirectoryCoordinator>,
    access_control: Arc<AccessControl>,
}

impl DirectoryApi {
    pub fn new(app_data: Arc<AppData>, access_control: Arc<AccessControl>) -> Self {
        Self {
            directory_coordinator: Arc::new(DirectoryCoordinator::new(app_data)),
            access_control,
        }
    }
}

#[derive(Tags)]
enum DirectoryTags {
    Directory,
}

#[OpenApi(prefix_path = "/users/directory")]
impl DirectoryApi {
    /// Users in the directory
    #[oai(path = "/users", method = "get", tag = "DirectoryTags::Directory")]
    async fn list_users(&self, req: &Request) -> Result<Json<DirectoryUserListResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let users = self.directory_coordinator.list_users().await?;
            Ok::<_, ApiError>(Json(DirectoryUserListResponse::from(users)))
        }
        .await;

        record_outcome(req, result, |list| {
            ResponseSummary::ok("Directory users fetched").with_count(list.data.len())
        })
    }

    /// Groups in the directory
    #[oai(path = "/groups", method = "get", tag = "DirectoryTags::Directory")]
    async fn list_groups(
        &self,
        req: &Request,
    ) -> Result<Json<DirectoryGroupListResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let groups = self.directory_coordinator.list_groups().await?;
            Ok::<_, ApiError>(Json(DirectoryGroupListResponse::from(groups)))
        }
        .await;

        record_outcome(req, result, |list| {
            ResponseSummary::ok("Directory groups fetched").with_count(list.data.len())
        })
    }

    /// Groups and directory roles of one directory user
    #[oai(
        path = "/users/:external_id/memberships",
        method = "get",
        tag = "DirectoryTags::Directory"
    )]
    async fn list_user_memberships(
        &self,
        req: &Request,
        external_id: Path<String>,
    ) -> Result<Json<DirectoryGroupListResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let groups = self
                .directory_coordinator
                .list_user_memberships(&external_id.0)
                .await?;
            Ok::<_, ApiError>(Json(DirectoryGroupListResponse::from(groups)))
        }
        .await;

        record_outcome(req, result, |list| {
            ResponseSummary::ok("Directory memberships fetched").with_count(list.data.len())
        })
    }

    /// Create local accounts for directory users that have none
    #[oai(path = "/sync", method = "post", tag = "DirectoryTags::Directory")]
    async fn synchronize(&self, req: &Request) -> Result<Json<SyncResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let sync = self.directory_coordinator.synchronize().await?;
            Ok::<_, ApiError>(Json(SyncResponse::from(sync)))
        }
        .await;

        record_outcome(req, result, |sync| {
            ResponseSummary::ok(sync.message.clone()).with_count(sync.new_users_count as usize)
        })
    }

    /// The active directory config, without its client secret
    #[oai(path = "/config", method = "get", tag = "DirectoryTags::Directory")]
    async fn get_config(&self, req: &Request) -> Result<Json<DirectoryConfigResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let config = self.directory_coordinator.active_config().await?;
            Ok::<_, ApiError>(Json(DirectoryConfigResponse {
                success: true,
                data: config.into(),
            }))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("Directory config fetched"))
    }

    /// Replace the active directory config
    #[oai(path = "/config", method = "put", tag = "DirectoryTags::Directory")]
    async fn save_config(
        &self,
        req: &Request,
        body: Json<DirectoryConfigRequest>,
    ) -> Result<Json<DirectoryConfigResponse>, ApiError> {
        let result = async {
            self.access_control.require(req, ADMIN_ONLY).await?;
            let config = self.directory_coordinator.save_config(body.0.into()).await?;
            Ok::<_, ApiError>(Json(DirectoryConfigResponse {
                success: true,
                data: config.into(),
            }))
        }
        .await;

        record_outcome(req, result, |_| ResponseSummary::ok("Directory config saved"))
    }
}
