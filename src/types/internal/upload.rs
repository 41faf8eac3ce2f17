/// A file received from a multipart form, already read into memory
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A proof file after it has been written to the upload directory
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Generated name on disk
    pub stored_name: String,

    /// Public URL the file is served from
    pub public_url: String,

    pub size: usize,

    /// Hex SHA-256 of the contents
    pub sha256: String,
}
