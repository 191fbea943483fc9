use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

use crate::errors::internal::{
    CredentialError, DatabaseError, DirectoryError, InternalError, UserError,
};

/// Error body returned by every endpoint
#[derive(Object, Debug, Clone)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Human-readable error message
    pub error: String,
}

/// API error types, one variant per HTTP status
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Bad or missing input, or a duplicate unique field
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired token, bad credentials, inactive account
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Role check failed
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Entity not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Unexpected or upstream failure
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        success: false,
        error: message.into(),
    })
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body(message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(body(message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(body(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body(message))
    }

    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body("server error"))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalError(body(message))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalError(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::InternalError(json) => &json.0.error,
        }
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(db_err) => {
                match db_err {
                    DatabaseError::Operation { operation, .. } => {
                        tracing::error!("Database error in {}: {}", operation, err);
                    }
                    _ => tracing::error!("Database transaction error: {}", err),
                }
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::Credential(cred) => match cred {
                CredentialError::AccountNotFound { .. } => Self::not_found("User not found"),
                CredentialError::PasswordHashingFailed(_) => {
                    tracing::error!("Credential error: {}", err);
                    Self::internal_server_error()
                }
                CredentialError::InvalidToken { reason } => {
                    tracing::debug!("Rejected token: {}", reason);
                    Self::unauthorized("Unauthorized user")
                }
                other => Self::unauthorized(other.to_string()),
            },

            InternalError::User(user_err) => match user_err {
                UserError::DuplicateEmail { .. } | UserError::Validation(_) => {
                    Self::bad_request(user_err.to_string())
                }
                UserError::UserIdNotFound { .. } => Self::not_found(user_err.to_string()),
                UserError::AdminAlreadyExists => Self::forbidden(user_err.to_string()),
            },

            InternalError::Directory(dir_err) => match dir_err {
                DirectoryError::CredentialsRejected => Self::unauthorized(dir_err.to_string()),
                DirectoryError::NotConfigured => Self::internal(dir_err.to_string()),
                DirectoryError::TokenMint(_) | DirectoryError::Upstream { .. } => {
                    tracing::error!("Directory error: {}", err);
                    Self::internal("Error fetching data from directory")
                }
            },
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        ApiError::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
