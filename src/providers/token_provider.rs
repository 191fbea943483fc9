use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use std::fmt;
use std::sync::Arc;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::Claims;

/// Issues and verifies HS256 bearer tokens
///
/// Verification is pure: signature and expiry only, no store access and no shared state.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration_minutes: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, jwt_expiration_minutes: i64) -> Self {
        Self {
            secret_manager,
            jwt_expiration_minutes,
        }
    }

    /// Lifetime of issued tokens in seconds
    pub fn expires_in(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate a JWT whose subject is the user id
    ///
    /// # Returns
    /// * `Result<String, InternalError>` - The encoded JWT
    pub fn generate_jwt(&self, user_id: &str) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        self.generate_jwt_at(user_id, now, now + self.expires_in())
    }

    fn generate_jwt_at(&self, user_id: &str, iat: i64, exp: i64) -> Result<String, InternalError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
            iat,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Validate a JWT and return the claims
    ///
    /// # Errors
    /// * `CredentialError::ExpiredToken` - `exp` is in the past
    /// * `CredentialError::InvalidToken` - Bad signature, wrong algorithm or malformed
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(CredentialError::ExpiredToken),
            _ => {
                tracing::debug!("JWT rejected: {}", e);
                InternalError::from(CredentialError::invalid_token(
                    "invalid signature or malformed",
                ))
            }
        })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}min }}",
            self.jwt_expiration_minutes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn create_test_token_provider() -> TokenProvider {
        let secret_manager = Arc::new(SecretManager::from_values(
            TEST_SECRET,
            "test-pepper-for-unit-tests",
        ));
        TokenProvider::new(secret_manager, 60)
    }

    #[test]
    fn test_generate_and_validate_round_trip() {
        let token_provider = create_test_token_provider();

        let token = token_provider.generate_jwt("user-123").unwrap();
        let claims = token_provider.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token_provider = create_test_token_provider();
        let now = Utc::now().timestamp();

        let token = token_provider
            .generate_jwt_at("user-123", now - 7200, now - 1)
            .unwrap();

        match token_provider.validate_jwt(&token) {
            Err(InternalError::Credential(CredentialError::ExpiredToken)) => {}
            other => panic!("Expected ExpiredToken, got {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token_provider = create_test_token_provider();
        let other = TokenProvider::new(
            Arc::new(SecretManager::from_values(
                "another-secret-key-minimum-32-characters",
                "test-pepper-for-unit-tests",
            )),
            60,
        );

        let token = other.generate_jwt("user-123").unwrap();

        match token_provider.validate_jwt(&token) {
            Err(InternalError::Credential(CredentialError::InvalidToken { .. })) => {}
            other => panic!("Expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token_provider = create_test_token_provider();
        let token = token_provider.generate_jwt("user-123").unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = format!("{}x", parts[1]);
        let tampered = parts.join(".");

        assert!(token_provider.validate_jwt(&tampered).is_err());
        assert!(token_provider.validate_jwt("not-a-jwt").is_err());
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let token_provider = create_test_token_provider();

        let debug_output = format!("{:?}", token_provider);
        assert!(!debug_output.contains(TEST_SECRET));
        assert!(debug_output.contains("<redacted>"));

        let display_output = format!("{}", token_provider);
        assert!(display_output.contains("60min"));
    }
}
