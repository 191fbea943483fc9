use serde::{Deserialize, Serialize};

use crate::types::db::user::{self, Role};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Authenticated caller, resolved from a bearer token on every request
///
/// Always holds the freshly loaded user row, so role and active state are current.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user: user::Model,
    pub claims: Claims,
}

impl Identity {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}
