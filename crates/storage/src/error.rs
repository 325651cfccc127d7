// crates/storage/src/error.rs
//! Error types for object storage operations

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the bucket
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (reading local files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage API answered with an error body
    #[error("Storage API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// No object with exactly this name exists
    #[error("File not found in bucket: {0}")]
    FileNotFound(String),

    /// The API answered with something we could not understand
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Manifest or gallery problem
    #[error(transparent)]
    Gallery(#[from] galleria_core::AppError),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every file of an upload failed
    #[error("No files were uploaded ({failed} failed)")]
    NothingUploaded { failed: usize },
}

impl StorageError {
    /// Returns true if trying again later could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Http(e) => e.is_timeout() || e.is_connect(),
            StorageError::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request itself was rejected (4xx)
    pub fn is_client_error(&self) -> bool {
        match self {
            StorageError::Http(e) => e.status().is_some_and(|s| s.is_client_error()),
            StorageError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns true for rejected or expired credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StorageError::Api { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> StorageError {
        StorageError::Api {
            status,
            code: "code".to_string(),
            message: "message".to_string(),
        }
    }

    #[test]
    fn test_error_display() {
        let err = api(401);
        assert_eq!(err.to_string(), "Storage API error 401 (code): message");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(api(503).is_retryable());
        assert!(api(429).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!StorageError::FileNotFound("x".to_string()).is_retryable());
    }

    #[test]
    fn test_client_errors() {
        assert!(api(404).is_client_error());
        assert!(!api(500).is_client_error());
        assert!(api(401).is_unauthorized());
    }

    #[test]
    fn test_gallery_error_is_transparent() {
        let err: StorageError = galleria_core::AppError::GalleryNotFound {
            id: "gallery-1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Gallery not found: gallery-1");
    }
}
