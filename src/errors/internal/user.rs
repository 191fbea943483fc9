use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User Already Exist")]
    DuplicateEmail { email: String },

    #[error("User not found")]
    UserIdNotFound { user_id: String },

    #[error("An admin user already exists.")]
    AdminAlreadyExists,

    #[error("{0}")]
    Validation(String),
}

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
