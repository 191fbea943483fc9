use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Secret-related failures at startup
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Load and validate all secrets from the given provider
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env: Arc<dyn EnvironmentProvider>) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env.as_ref(), &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env.as_ref(), &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    /// Build directly from values; used by tests and the CLI
    pub fn from_values(jwt_secret: impl Into<String>, password_pepper: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            password_pepper: password_pepper.into(),
        }
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env("JWT_SECRET").required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PASSWORD_PEPPER").required(true).min_length(16)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => {
                    return Err(SecretError::Missing {
                        secret_name: name.clone(),
                    })
                }
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::InvalidLength {
                    secret_name: config.secret_type.name().to_string(),
                    expected: min_len,
                    actual: value.len(),
                });
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const PEPPER: &str = "valid-pepper-16ch";

    fn load(vars: &[(&str, &str)]) -> Result<SecretManager, SecretError> {
        SecretManager::from_env_provider(Arc::new(MockEnvironment::with_vars(vars)))
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let manager = load(&[("JWT_SECRET", JWT), ("PASSWORD_PEPPER", PEPPER)]).unwrap();

        assert_eq!(manager.jwt_secret(), JWT);
        assert_eq!(manager.password_pepper(), PEPPER);
    }

    #[test]
    fn test_missing_jwt_secret() {
        match load(&[("PASSWORD_PEPPER", PEPPER)]) {
            Err(SecretError::Missing { secret_name }) => assert_eq!(secret_name, "JWT_SECRET"),
            other => panic!("Expected Missing error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_short_pepper_rejected() {
        match load(&[("JWT_SECRET", JWT), ("PASSWORD_PEPPER", "short")]) {
            Err(SecretError::InvalidLength { secret_name, expected, actual }) => {
                assert_eq!(secret_name, "PASSWORD_PEPPER");
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected InvalidLength error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_debug_and_display_do_not_expose_secrets() {
        let manager = SecretManager::from_values(JWT, PEPPER);

        let debug_output = format!("{:?}", manager);
        let display_output = format!("{}", manager);

        assert!(!debug_output.contains(JWT));
        assert!(!debug_output.contains(PEPPER));
        assert_eq!(debug_output.matches("<redacted>").count(), 2);
        assert!(!display_output.contains(JWT));
    }
}
