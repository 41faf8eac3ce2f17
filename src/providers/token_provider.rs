use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Issues and validates HS256 access tokens
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

    /// Lifetime of an access token in seconds
    pub fn expires_in(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Issue an access token carrying the user's current role
    ///
    /// Returns the encoded token and its claims.
    pub fn issue_token(&self, user: &user::Model) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: now + self.expires_in(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok((token, claims))
    }

    /// Validate a token and return its claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken("jwt".to_string()).into(),
            ErrorKind::InvalidSignature => {
                tracing::warn!("JWT with invalid signature presented");
                CredentialError::invalid_token("jwt", "invalid signature").into()
            }
            _ => CredentialError::invalid_token("jwt", "malformed").into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use crate::types::db::Role;

    const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn create_test_token_provider(secret: &str, minutes: i64) -> TokenProvider {
        let env = MockEnvironment::empty()
            .with_var("JWT_SECRET", secret)
            .with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests");
        let secret_manager = Arc::new(SecretManager::from_env_provider(&env).unwrap());
        TokenProvider::new(secret_manager, minutes)
    }

    fn test_user() -> user::Model {
        user::Model {
            id: 7,
            username: "buyer".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            is_active: true,
            created_at: 0,
            last_login_at: None,
            ip_address: None,
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let provider = create_test_token_provider(TEST_JWT_SECRET, 60);
        let (token, issued) = provider.issue_token(&test_user()).unwrap();

        let claims = provider.validate_jwt(&token).unwrap();

        assert_eq!(claims, issued);
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let provider = create_test_token_provider(TEST_JWT_SECRET, 60);
        let (_, first) = provider.issue_token(&test_user()).unwrap();
        let (_, second) = provider.issue_token(&test_user()).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60s leeway
        let provider = create_test_token_provider(TEST_JWT_SECRET, -5);
        let (token, _) = provider.issue_token(&test_user()).unwrap();

        let err = provider.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::ExpiredToken(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = create_test_token_provider("another-secret-key-that-is-32-chars-long", 60);
        let verifier = create_test_token_provider(TEST_JWT_SECRET, 60);
        let (token, _) = issuer.issue_token(&test_user()).unwrap();

        let err = verifier.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let provider = create_test_token_provider(TEST_JWT_SECRET, 60);

        let err = provider.validate_jwt("not.a.jwt").unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }
}
