//! Error types for persistence and upload.

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors from a [`DesignStore`](crate::DesignStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Design not found: {id}")]
    NotFound { id: String },

    #[error("Invalid design: {0}")]
    InvalidDesign(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from [`upload_image`](crate::upload_image).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("Invalid file type: {content_type}")]
    InvalidFileType { content_type: String },

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Failed to upload file to storage: {0}")]
    Storage(String),
}
