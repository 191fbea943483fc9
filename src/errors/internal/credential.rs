use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    /// No account for this email
    #[error("User not found: {email}")]
    AccountNotFound { email: String },

    /// Account exists but is soft-deleted
    #[error("No account found.")]
    AccountInactive,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized user")]
    MissingToken,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}

impl CredentialError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }
}
