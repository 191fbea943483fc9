use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// No active configuration with client id and secret
    #[error("Directory settings not found.")]
    NotConfigured,

    /// Configuration exists but the directory refused it
    #[error("Directory credentials mismatched")]
    CredentialsRejected,

    #[error("Failed to acquire directory access token: {0}")]
    TokenMint(String),

    #[error("Directory request {operation} failed: {message}")]
    Upstream { operation: String, message: String },
}

impl DirectoryError {
    pub fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
