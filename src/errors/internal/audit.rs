use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to encode activity details: {0}")]
    DetailsEncoding(String),
}
