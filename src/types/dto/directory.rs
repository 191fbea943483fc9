use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::directory_config;
use crate::types::dto::user::UserResponse;
use crate::types::internal::{DirectoryCredentials, DirectoryGroup, DirectoryIdentity, SyncResult};

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUserDto {
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
}

impl From<DirectoryIdentity> for DirectoryUserDto {
    fn from(identity: DirectoryIdentity) -> Self {
        Self {
            id: identity.id,
            display_name: identity.display_name,
            mail: identity.mail,
            user_principal_name: identity.user_principal_name,
        }
    }
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryGroupDto {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// `#microsoft.graph.group` or `#microsoft.graph.directoryRole` for memberships
    pub kind: Option<String>,
}

impl From<DirectoryGroup> for DirectoryGroupDto {
    fn from(group: DirectoryGroup) -> Self {
        Self {
            id: group.id,
            display_name: group.display_name,
            description: group.description,
            kind: group.odata_type,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DirectoryUserListResponse {
    pub success: bool,
    pub count: u64,
    pub data: Vec<DirectoryUserDto>,
}

impl From<Vec<DirectoryIdentity>> for DirectoryUserListResponse {
    fn from(users: Vec<DirectoryIdentity>) -> Self {
        Self {
            success: true,
            count: users.len() as u64,
            data: users.into_iter().map(DirectoryUserDto::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DirectoryGroupListResponse {
    pub success: bool,
    pub count: u64,
    pub data: Vec<DirectoryGroupDto>,
}

impl From<Vec<DirectoryGroup>> for DirectoryGroupListResponse {
    fn from(groups: Vec<DirectoryGroup>) -> Self {
        Self {
            success: true,
            count: groups.len() as u64,
            data: groups.into_iter().map(DirectoryGroupDto::from).collect(),
        }
    }
}

/// Result of a directory synchronization
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,

    /// Number of local users created by this run
    pub new_users_count: u64,

    /// `yyyy-MM-dd HH:mm:ss`, also stored on the active directory config
    pub synchronized_at: String,

    /// Every local user after the run
    pub all_users: Vec<UserResponse>,
}

impl From<SyncResult> for SyncResponse {
    fn from(result: SyncResult) -> Self {
        Self {
            success: true,
            message: "User sync completed".to_string(),
            new_users_count: result.new_users_count as u64,
            synchronized_at: result.synchronized_at,
            all_users: result.all_users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DirectoryConfigRequest {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl From<DirectoryConfigRequest> for DirectoryCredentials {
    fn from(request: DirectoryConfigRequest) -> Self {
        DirectoryCredentials {
            tenant_id: request.tenant_id,
            client_id: request.client_id,
            client_secret: request.client_secret,
        }
    }
}

/// Active directory config. The client secret is never returned.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DirectoryConfigDto {
    pub id: i32,
    pub tenant_id: String,
    pub client_id: String,
    pub has_client_secret: bool,
    pub is_active: bool,
    pub last_synchronization: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<directory_config::Model> for DirectoryConfigDto {
    fn from(model: directory_config::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            client_id: model.client_id,
            has_client_secret: !model.client_secret.is_empty(),
            is_active: model.is_active,
            last_synchronization: model.last_synchronization,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DirectoryConfigResponse {
    pub success: bool,
    pub data: DirectoryConfigDto,
}
