use crate::types::db::user;

/// Which lookup key found an existing local user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    ExternalId,
    Email,
    Both,
}

/// Outcome of resolving one directory identity against the local store
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An existing user was found; it is left untouched
    Matched { user: user::Model, matched_by: MatchKey },
    /// No match on either key; a directory-origin user was created
    Created(user::Model),
}

impl Resolution {
    pub fn user(&self) -> &user::Model {
        match self {
            Resolution::Matched { user, .. } => user,
            Resolution::Created(user) => user,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncResult {
    pub new_users_count: usize,
    pub created_users: Vec<user::Model>,
    pub all_users: Vec<user::Model>,
    pub synchronized_at: String,
}
