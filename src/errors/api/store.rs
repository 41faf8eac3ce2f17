use crate::errors::internal::{CatalogError, CredentialError, InternalError, PaymentError, UploadError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for storefront endpoints
#[derive(Object, Debug)]
pub struct StoreErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Storefront error types: catalog, payments, settings
#[derive(ApiResponse, Debug)]
pub enum StoreError {
    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<StoreErrorResponse>),

    /// Caller lacks the role or ownership required
    #[oai(status = 403)]
    Forbidden(Json<StoreErrorResponse>),

    /// Product not found
    #[oai(status = 404)]
    ProductNotFound(Json<StoreErrorResponse>),

    /// Payment not found
    #[oai(status = 404)]
    PaymentNotFound(Json<StoreErrorResponse>),

    /// Product still referenced by payments
    #[oai(status = 409)]
    ProductInUse(Json<StoreErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<StoreErrorResponse>),

    /// Multipart body carried no proof file
    #[oai(status = 400)]
    MissingFile(Json<StoreErrorResponse>),

    /// File type outside jpeg/png/pdf
    #[oai(status = 400)]
    UnsupportedFileType(Json<StoreErrorResponse>),

    /// File larger than the configured limit
    #[oai(status = 413)]
    PayloadTooLarge(Json<StoreErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<StoreErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<StoreErrorResponse> {
    Json(StoreErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl StoreError {
    pub fn unauthorized() -> Self {
        StoreError::Unauthorized(body("unauthorized", "Authentication required", 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        StoreError::Forbidden(body("forbidden", message, 403))
    }

    pub fn admin_required() -> Self {
        Self::forbidden("Admin role required")
    }

    pub fn product_not_found(product_id: i32) -> Self {
        StoreError::ProductNotFound(body(
            "product_not_found",
            format!("Product not found: {}", product_id),
            404,
        ))
    }

    pub fn payment_not_found(payment_id: i32) -> Self {
        StoreError::PaymentNotFound(body(
            "payment_not_found",
            format!("Payment not found: {}", payment_id),
            404,
        ))
    }

    pub fn product_in_use(product_id: i32) -> Self {
        StoreError::ProductInUse(body(
            "product_in_use",
            format!("Product {} has payments and cannot be deleted", product_id),
            409,
        ))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        StoreError::ValidationFailed(body("validation_failed", message, 400))
    }

    pub fn missing_file() -> Self {
        StoreError::MissingFile(body("missing_file", "No file uploaded", 400))
    }

    pub fn unsupported_file_type() -> Self {
        StoreError::UnsupportedFileType(body(
            "unsupported_file_type",
            "Only JPEG, PNG and PDF files are allowed",
            400,
        ))
    }

    pub fn payload_too_large(max: usize) -> Self {
        StoreError::PayloadTooLarge(body(
            "payload_too_large",
            format!("File exceeds the {} byte limit", max),
            413,
        ))
    }

    /// Convert InternalError to StoreError
    ///
    /// Infrastructure errors are logged and collapsed into a generic 500.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            e if e.is_infrastructure() => {
                tracing::error!("Infrastructure error in store operation: {}", err);
                Self::internal_server_error()
            }

            InternalError::Validation { .. } => Self::validation_failed(err.to_string()),

            InternalError::Credential(
                CredentialError::MissingAuthentication
                | CredentialError::InvalidToken { .. }
                | CredentialError::ExpiredToken(_),
            ) => Self::unauthorized(),

            InternalError::Catalog(CatalogError::ProductNotFound(product_id)) => {
                Self::product_not_found(*product_id)
            }
            InternalError::Catalog(CatalogError::ProductInUse(product_id)) => {
                Self::product_in_use(*product_id)
            }
            InternalError::Payment(PaymentError::PaymentNotFound(payment_id)) => {
                Self::payment_not_found(*payment_id)
            }
            InternalError::Payment(PaymentError::NotPaymentOwner(payment_id)) => {
                tracing::warn!("Upload attempt on foreign payment {}", payment_id);
                Self::forbidden("Payment belongs to another user")
            }
            InternalError::Upload(UploadError::MissingFile) => Self::missing_file(),
            InternalError::Upload(UploadError::UnsupportedFileType(kind)) => {
                tracing::debug!("Rejected upload of type {}", kind);
                Self::unsupported_file_type()
            }
            InternalError::Upload(UploadError::TooLarge { max, .. }) => {
                Self::payload_too_large(*max)
            }

            _ => {
                tracing::error!("Unexpected error in store operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        StoreError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    fn response(&self) -> &StoreErrorResponse {
        match self {
            StoreError::Unauthorized(json)
            | StoreError::Forbidden(json)
            | StoreError::ProductNotFound(json)
            | StoreError::PaymentNotFound(json)
            | StoreError::ProductInUse(json)
            | StoreError::ValidationFailed(json)
            | StoreError::MissingFile(json)
            | StoreError::UnsupportedFileType(json)
            | StoreError::PayloadTooLarge(json)
            | StoreError::InternalError(json) => &json.0,
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

impl From<InternalError> for StoreError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
