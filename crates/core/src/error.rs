//! Error types for the gallery domain

use thiserror::Error;

/// Main error type for the gallery domain
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Manifest Errors =====
    /// Manifest text is not valid JSON
    #[error("Manifest parse error: {source}")]
    ManifestParse {
        #[source]
        source: serde_json::Error,
    },

    /// Manifest is valid JSON but has the wrong shape
    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    /// Manifest could not be serialized
    #[error("Manifest serialization failed: {source}")]
    ManifestSerialize {
        #[source]
        source: serde_json::Error,
    },

    // ===== Gallery Errors =====
    /// No gallery with the requested id
    #[error("Gallery not found: {id}")]
    GalleryNotFound { id: String },
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::ManifestParse { source: err }
    }
}
