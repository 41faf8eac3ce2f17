use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Warning not found: {0}")]
    WarningNotFound(i32),
}
