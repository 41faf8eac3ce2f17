use thiserror::Error;

/// Login, registration and token failures
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Username is reserved: {0}")]
    ReservedUsername(String),

    #[error("Authentication required")]
    MissingAuthentication,

    #[error("Invalid token: {token_type} - {reason}")]
    InvalidToken {
        token_type: String,
        reason: String,
    },

    #[error("Expired token: {0}")]
    ExpiredToken(String),
}

impl CredentialError {
    pub fn invalid_token(token_type: &str, reason: &str) -> Self {
        Self::InvalidToken {
            token_type: token_type.to_string(),
            reason: reason.to_string(),
        }
    }
}
