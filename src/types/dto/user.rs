use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::user::{self, Role};
use crate::types::internal::{NewUser, Origin, UserUpdate};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    User,
    Admin,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::User => RoleDto::User,
            Role::Admin => RoleDto::Admin,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => Role::User,
            RoleDto::Admin => Role::Admin,
        }
    }
}

/// Account origin filter for user listing
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OriginDto {
    Local,
    Directory,
}

impl From<OriginDto> for Origin {
    fn from(origin: OriginDto) -> Self {
        match origin {
            OriginDto::Local => Origin::Local,
            OriginDto::Directory => Origin::Directory,
        }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: RoleDto,
    pub is_active: bool,
    pub is_directory_user: bool,
    pub external_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role.into(),
            is_active: model.is_active,
            is_directory_user: model.is_directory_user,
            external_id: model.external_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request model for creating a local account (admin only)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,

    /// Defaults to `user`
    pub role: Option<RoleDto>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role.map(Role::from).unwrap_or_default(),
        }
    }
}

/// Request model for the one-time admin bootstrap
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<CreateAdminRequest> for NewUser {
    fn from(request: CreateAdminRequest) -> Self {
        NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role: Role::Admin,
        }
    }
}

/// Partial update. `role` and `is_active` require the admin role.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<RoleDto>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        UserUpdate {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role.map(Role::from),
            is_active: request.is_active,
        }
    }
}

/// Single user envelope
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub msg: String,
    pub data: UserResponse,
}

impl UserEnvelope {
    pub fn new(msg: impl Into<String>, user: user::Model) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            data: user.into(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub success: bool,
    pub count: u64,
    pub data: Vec<UserResponse>,
}

impl From<Vec<user::Model>> for UserListResponse {
    fn from(users: Vec<user::Model>) -> Self {
        Self {
            success: true,
            count: users.len() as u64,
            data: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}
