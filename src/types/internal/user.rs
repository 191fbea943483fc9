use crate::types::db::user::Role;

/// Where an account came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Directory,
}

/// Fixed set of optional filters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub origin: Option<Origin>,
    pub active: Option<bool>,
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
}

/// Input for creating a local account. The password is plaintext and hashed by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn touches_privileges(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }
}
