// crates/storage/src/local.rs
//! Local image files queued for upload

use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Extensions accepted as images, with their MIME types
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
];

/// MIME type for an image file name, by extension
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

pub fn is_image_file(file_name: &str) -> bool {
    content_type_for(file_name).is_some()
}

/// An image read into memory
#[derive(Debug, Clone)]
pub struct LocalImage {
    /// Bare file name used as the object name inside the gallery folder
    pub file_name: String,
    pub data: Bytes,
    pub content_type: Option<String>,
    pub last_modified_millis: Option<i64>,
}

impl LocalImage {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name).map(str::to_string),
            file_name,
            data: data.into(),
            last_modified_millis: None,
        }
    }

    /// Reads an image file, rejecting non-image extensions
    pub async fn read(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StorageError::InvalidInput(format!("{} has no usable file name", path.display()))
            })?
            .to_string();

        if !is_image_file(&file_name) {
            return Err(StorageError::InvalidInput(format!(
                "{} is not an image file",
                path.display()
            )));
        }

        let data = tokio::fs::read(path).await?;
        let last_modified_millis = tokio::fs::metadata(path)
            .await?
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_millis()).ok());

        let mut image = Self::new(file_name, data);
        image.last_modified_millis = last_modified_millis;
        Ok(image)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
