use crate::errors::internal::{AccountError, CredentialError, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Unknown user, inactive user or wrong password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Bearer token missing
    #[oai(status = 401)]
    MissingAuthentication(Json<AuthErrorResponse>),

    /// Bearer token malformed or signed with another key
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// Bearer token past its expiry
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Username is already registered
    #[oai(status = 400)]
    DuplicateUsername(Json<AuthErrorResponse>),

    /// Username is reserved for system accounts
    #[oai(status = 400)]
    ReservedUsername(Json<AuthErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// Caller already holds an elevated role
    #[oai(status = 400)]
    AlreadyElevated(Json<AuthErrorResponse>),

    /// Caller already has a pending admin request
    #[oai(status = 400)]
    RequestAlreadyPending(Json<AuthErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<AuthErrorResponse> {
    Json(AuthErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl AuthError {
    /// Same answer for unknown users and wrong passwords
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(body("invalid_credentials", "Invalid credentials", 401))
    }

    pub fn missing_authentication() -> Self {
        AuthError::MissingAuthentication(body(
            "missing_authentication",
            "Authentication required",
            401,
        ))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(body("invalid_token", "Invalid or malformed token", 401))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(body("expired_token", "Token has expired", 401))
    }

    pub fn duplicate_username() -> Self {
        AuthError::DuplicateUsername(body("duplicate_username", "Username already exists", 400))
    }

    pub fn reserved_username() -> Self {
        AuthError::ReservedUsername(body("reserved_username", "Username is not available", 400))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        AuthError::ValidationFailed(body("validation_failed", message, 400))
    }

    pub fn already_elevated() -> Self {
        AuthError::AlreadyElevated(body(
            "already_elevated",
            "User already has admin privileges",
            400,
        ))
    }

    pub fn request_already_pending() -> Self {
        AuthError::RequestAlreadyPending(body(
            "request_already_pending",
            "Admin request already pending",
            400,
        ))
    }

    pub fn user_not_found() -> Self {
        AuthError::UserNotFound(body("user_not_found", "User not found", 404))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            e if e.is_infrastructure() => {
                tracing::error!("Infrastructure error in auth operation: {}", err);
                Self::internal_server_error()
            }

            InternalError::Validation { .. } => Self::validation_failed(err.to_string()),

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!("Duplicate username attempt: {}", username);
                Self::duplicate_username()
            }
            InternalError::Credential(CredentialError::ReservedUsername(username)) => {
                tracing::warn!("Reserved username attempt: {}", username);
                Self::reserved_username()
            }
            InternalError::Credential(CredentialError::MissingAuthentication) => {
                Self::missing_authentication()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                Self::expired_token()
            }

            InternalError::Account(AccountError::UserNotFound(_)) => Self::user_not_found(),
            InternalError::Account(AccountError::AlreadyElevated(_)) => Self::already_elevated(),
            InternalError::Account(AccountError::RequestAlreadyPending(_)) => {
                Self::request_already_pending()
            }

            // Other domain errors that shouldn't appear in auth context
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    fn response(&self) -> &AuthErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::MissingAuthentication(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::DuplicateUsername(json)
            | AuthError::ReservedUsername(json)
            | AuthError::ValidationFailed(json)
            | AuthError::AlreadyElevated(json)
            | AuthError::RequestAlreadyPending(json)
            | AuthError::UserNotFound(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
