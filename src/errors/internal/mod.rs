use thiserror::Error;

pub mod credential;
pub mod database;
pub mod directory;
pub mod user;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use directory::DirectoryError;
pub use user::UserError;

/// Internal error type for store, provider and coordinator operations
///
/// Separates infrastructure errors (shared) from domain errors.
/// Not exposed via API - endpoints convert through `ApiError::from_internal_error`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
