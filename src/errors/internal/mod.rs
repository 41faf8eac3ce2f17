use thiserror::Error;

pub mod account;
pub mod audit;
pub mod catalog;
pub mod credential;
pub mod database;
pub mod payment;
pub mod settings;
pub mod upload;

pub use account::AccountError;
pub use audit::AuditError;
pub use catalog::CatalogError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use payment::PaymentError;
pub use settings::SettingsError;
pub use upload::UploadError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure variants are shared; domain variants wrap the per-area enums.
/// Never returned from an endpoint directly: the API layer converts it into
/// `AuthError`, `AdminError` or `StoreError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error("I/O error: {operation} failed: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn io(operation: &str, source: std::io::Error) -> InternalError {
        InternalError::Io {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> InternalError {
        InternalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Infrastructure failures that must not leak details to clients
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            InternalError::Database(_)
                | InternalError::Parse { .. }
                | InternalError::Crypto { .. }
                | InternalError::Io { .. }
                | InternalError::Audit(_)
        )
    }
}
