use crate::errors::internal::{
    AccountError, CredentialError, InternalError, PaymentError, SettingsError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for admin endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Admin operation error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<AdminErrorResponse>),

    /// Admin or owner role required
    #[oai(status = 403)]
    AdminRequired(Json<AdminErrorResponse>),

    /// Owner role required
    #[oai(status = 403)]
    OwnerRequired(Json<AdminErrorResponse>),

    /// Cannot modify your own account
    #[oai(status = 403)]
    SelfModificationDenied(Json<AdminErrorResponse>),

    /// Owner accounts cannot be granted or modified
    #[oai(status = 403)]
    OwnerImmutable(Json<AdminErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<AdminErrorResponse>),

    /// Admin request not found
    #[oai(status = 404)]
    RequestNotFound(Json<AdminErrorResponse>),

    /// Payment not found
    #[oai(status = 404)]
    PaymentNotFound(Json<AdminErrorResponse>),

    /// Warning not found
    #[oai(status = 404)]
    WarningNotFound(Json<AdminErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<AdminErrorResponse> {
    Json(AdminErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl AdminError {
    pub fn unauthorized() -> Self {
        AdminError::Unauthorized(body("unauthorized", "Authentication required", 401))
    }

    pub fn admin_required() -> Self {
        AdminError::AdminRequired(body("admin_required", "Admin role required", 403))
    }

    pub fn owner_required() -> Self {
        AdminError::OwnerRequired(body("owner_required", "Owner role required", 403))
    }

    pub fn self_modification_denied() -> Self {
        AdminError::SelfModificationDenied(body(
            "self_modification_denied",
            "Cannot modify your own account",
            403,
        ))
    }

    pub fn owner_immutable() -> Self {
        AdminError::OwnerImmutable(body(
            "owner_immutable",
            "Owner accounts cannot be granted or modified",
            403,
        ))
    }

    pub fn user_not_found(user_id: i32) -> Self {
        AdminError::UserNotFound(body("user_not_found", format!("User not found: {}", user_id), 404))
    }

    pub fn request_not_found(request_id: i32) -> Self {
        AdminError::RequestNotFound(body(
            "request_not_found",
            format!("Admin request not found: {}", request_id),
            404,
        ))
    }

    pub fn payment_not_found(payment_id: i32) -> Self {
        AdminError::PaymentNotFound(body(
            "payment_not_found",
            format!("Payment not found: {}", payment_id),
            404,
        ))
    }

    pub fn warning_not_found(warning_id: i32) -> Self {
        AdminError::WarningNotFound(body(
            "warning_not_found",
            format!("Warning not found: {}", warning_id),
            404,
        ))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        AdminError::ValidationFailed(body("validation_failed", message, 400))
    }

    /// Convert InternalError to AdminError
    ///
    /// Infrastructure errors are logged and collapsed into a generic 500.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            e if e.is_infrastructure() => {
                tracing::error!("Infrastructure error in admin operation: {}", err);
                Self::internal_server_error()
            }

            InternalError::Validation { .. } => Self::validation_failed(err.to_string()),

            InternalError::Credential(
                CredentialError::MissingAuthentication
                | CredentialError::InvalidToken { .. }
                | CredentialError::ExpiredToken(_),
            ) => Self::unauthorized(),

            InternalError::Account(AccountError::UserNotFound(user_id)) => {
                Self::user_not_found(*user_id)
            }
            InternalError::Account(AccountError::RequestNotFound(request_id)) => {
                Self::request_not_found(*request_id)
            }
            InternalError::Account(AccountError::SelfModificationDenied) => {
                tracing::warn!("Self modification attempt blocked");
                Self::self_modification_denied()
            }
            InternalError::Account(AccountError::OwnerImmutable) => {
                tracing::warn!("Owner modification attempt blocked");
                Self::owner_immutable()
            }
            InternalError::Payment(PaymentError::PaymentNotFound(payment_id)) => {
                Self::payment_not_found(*payment_id)
            }
            InternalError::Settings(SettingsError::WarningNotFound(warning_id)) => {
                Self::warning_not_found(*warning_id)
            }

            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        AdminError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    fn response(&self) -> &AdminErrorResponse {
        match self {
            AdminError::Unauthorized(json)
            | AdminError::AdminRequired(json)
            | AdminError::OwnerRequired(json)
            | AdminError::SelfModificationDenied(json)
            | AdminError::OwnerImmutable(json)
            | AdminError::UserNotFound(json)
            | AdminError::RequestNotFound(json)
            | AdminError::PaymentNotFound(json)
            | AdminError::WarningNotFound(json)
            | AdminError::ValidationFailed(json)
            | AdminError::InternalError(json) => &json.0,
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

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
