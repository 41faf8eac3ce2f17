use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}
