use std::path::PathBuf;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UploadError;
use crate::types::internal::upload::{IncomingFile, StoredFile};

/// URL prefix the upload directory is served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf"];
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Validates and stores payment proof files
pub struct UploadProvider {
    upload_dir: PathBuf,
    max_bytes: usize,
}

impl UploadProvider {
    pub fn new(upload_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes,
        }
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check type and size; returns the lowercase extension to store under
    pub fn validate(&self, file: &IncomingFile) -> Result<String, InternalError> {
        if file.bytes.is_empty() {
            return Err(UploadError::MissingFile.into());
        }

        let extension = file
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::UnsupportedFileType(format!("extension '{}'", extension)).into());
        }

        let content_type = file
            .content_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::UnsupportedFileType(format!("content type '{}'", content_type)).into());
        }

        if file.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.bytes.len(),
                max: self.max_bytes,
            }
            .into());
        }

        Ok(extension)
    }

    /// Validate and write a proof file under a generated name
    pub async fn store_proof(&self, file: IncomingFile) -> Result<StoredFile, InternalError> {
        let extension = self.validate(&file)?;
        let stored_name = format!("proof-{}.{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| InternalError::io("create_upload_dir", e))?;

        tokio::fs::write(self.upload_dir.join(&stored_name), &file.bytes)
            .await
            .map_err(|e| InternalError::io("write_upload", e))?;

        let sha256 = format!("{:x}", Sha256::digest(&file.bytes));
        tracing::debug!("Stored proof {} ({} bytes)", stored_name, file.bytes.len());

        Ok(StoredFile {
            public_url: format!("{}/{}", UPLOADS_URL_PREFIX, stored_name),
            stored_name,
            size: file.bytes.len(),
            sha256,
        })
    }
}
