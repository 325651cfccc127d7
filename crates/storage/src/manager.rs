// crates/storage/src/manager.rs
//! Gallery upload, edit and delete on top of an [`ObjectStore`]

use crate::error::{StorageError, StorageResult};
use crate::local::LocalImage;
use crate::progress::{ProgressCallback, UploadProgress};
use crate::store::{ObjectStore, UploadObject};
use galleria_core::{default_folder_path, AppError, Gallery, LabelList, Manifest, UrlBuilder};

/// A gallery about to be uploaded
#[derive(Debug, Clone, Default)]
pub struct NewGallery {
    pub name: String,
    pub characters: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<LocalImage>,
}

/// Changes to apply to an existing gallery; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryEdit {
    pub name: Option<String>,
    pub characters: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl GalleryEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.characters.is_none() && self.tags.is_none()
    }
}

/// Outcome of [`GalleryManager::upload_gallery`]
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub gallery: Gallery,
    /// File name and error for each file that failed
    pub failed: Vec<(String, String)>,
}

/// Outcome of a delete; object failures do not stop the delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Ids removed from the manifest
    pub removed: Vec<String>,
    /// Ids that were not in the manifest
    pub missing: Vec<String>,
    pub files_deleted: usize,
    /// Object name and error for each object that could not be deleted
    pub files_failed: Vec<(String, String)>,
}

/// High-level gallery operations
pub struct GalleryManager<S: ObjectStore> {
    store: S,
    progress: Option<ProgressCallback>,
}

impl<S: ObjectStore> GalleryManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            progress: None,
        }
    }

    /// Calls `callback` after each file of an upload
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn manifest(&self) -> StorageResult<Manifest> {
        self.store.read_manifest().await
    }

    /// Uploads every image into `galleries/{name}/` and appends the gallery.
    ///
    /// Individual file failures are reported, not fatal. If nothing was
    /// uploaded the manifest is left untouched.
    pub async fn upload_gallery(&self, new_gallery: NewGallery) -> StorageResult<UploadReport> {
        let name = new_gallery.name.trim().to_string();
        if name.is_empty() {
            return Err(StorageError::InvalidInput(
                "gallery name must not be empty".to_string(),
            ));
        }
        if new_gallery.images.is_empty() {
            return Err(StorageError::InvalidInput(
                "at least one image is required".to_string(),
            ));
        }

        self.store.authorize().await?;

        let folder = default_folder_path(&name);
        let mut progress = UploadProgress::new(new_gallery.images.len());
        let mut uploaded = Vec::new();
        let mut failed = Vec::new();

        for image in new_gallery.images {
            let key = UrlBuilder::join_path(&[&folder, &image.file_name]);
            let size = image.size();
            let mut object = UploadObject::new(key, image.data);
            object.content_type = image.content_type;
            object.last_modified_millis = image.last_modified_millis;

            match self.store.upload(object).await {
                Ok(_) => {
                    progress.record_success(&image.file_name, size);
                    uploaded.push(image.file_name);
                }
                Err(e) => {
                    log::warn!("Upload of {} failed: {}", image.file_name, e);
                    progress.record_failure(&image.file_name);
                    failed.push((image.file_name, e.to_string()));
                }
            }

            if let Some(callback) = &self.progress {
                callback(&progress);
            }
        }

        if uploaded.is_empty() {
            return Err(StorageError::NothingUploaded {
                failed: failed.len(),
            });
        }

        let mut manifest = self.store.read_manifest().await?;

        uploaded.sort();
        let gallery = Gallery::new(format!("gallery-{}", chrono::Utc::now().timestamp_millis()), name)
            .with_characters(new_gallery.characters)
            .with_tags(new_gallery.tags)
            .with_images(uploaded);

        manifest.push(gallery.clone());
        self.store.write_manifest(&manifest).await?;

        log::info!(
            "Gallery '{}' created with {} images ({} failed)",
            gallery.name,
            gallery.file_count,
            failed.len()
        );
        Ok(UploadReport { gallery, failed })
    }

    /// Renames a gallery and/or replaces its labels.
    ///
    /// The folder path is kept on rename because the objects are not moved.
    pub async fn edit_gallery(&self, id: &str, edit: GalleryEdit) -> StorageResult<Gallery> {
        let mut manifest = self.store.read_manifest().await?;
        let gallery = manifest
            .find_mut(id)
            .ok_or_else(|| AppError::GalleryNotFound { id: id.to_string() })?;

        if let Some(name) = edit.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(StorageError::InvalidInput(
                    "gallery name must not be empty".to_string(),
                ));
            }
            gallery.name = name.to_string();
        }
        if let Some(characters) = edit.characters {
            gallery.character = LabelList::new(characters);
        }
        if let Some(tags) = edit.tags {
            gallery.tags = LabelList::new(tags);
        }

        let updated = gallery.clone();
        self.store.write_manifest(&manifest).await?;
        log::info!("Gallery {} updated", id);
        Ok(updated)
    }

    /// Deletes a gallery's images and its manifest record
    pub async fn delete_gallery(&self, id: &str) -> StorageResult<DeleteReport> {
        let manifest = self.store.read_manifest().await?;
        manifest.get(id)?;
        self.delete_from(manifest, &[id.to_string()]).await
    }

    /// Deletes several galleries with a single manifest rewrite.
    ///
    /// Unknown ids are reported in [`DeleteReport::missing`].
    pub async fn batch_delete(&self, ids: &[String]) -> StorageResult<DeleteReport> {
        let manifest = self.store.read_manifest().await?;
        self.delete_from(manifest, ids).await
    }

    async fn delete_from(
        &self,
        mut manifest: Manifest,
        ids: &[String],
    ) -> StorageResult<DeleteReport> {
        let mut report = DeleteReport::default();

        for id in ids {
            let Some(gallery) = manifest.remove(id) else {
                log::warn!("Gallery {} not in manifest, skipping", id);
                report.missing.push(id.clone());
                continue;
            };

            for key in gallery.object_keys() {
                match self.store.delete(&key).await {
                    Ok(()) => report.files_deleted += 1,
                    Err(e) => {
                        log::warn!("Could not delete {}: {}", key, e);
                        report.files_failed.push((key, e.to_string()));
                    }
                }
            }
            report.removed.push(gallery.id);
        }

        if !report.removed.is_empty() {
            self.store.write_manifest(&manifest).await?;
            log::info!("Deleted {} galleries", report.removed.len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn image(name: &str) -> LocalImage {
        LocalImage::new(name, name.as_bytes().to_vec())
    }

    fn new_gallery(name: &str, files: &[&str]) -> NewGallery {
        NewGallery {
            name: name.to_string(),
            images: files.iter().map(|f| image(f)).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upload_requires_name_and_images() {
        let manager = GalleryManager::new(MemoryStore::default());

        let result = manager.upload_gallery(new_gallery("  ", &["a.jpg"])).await;
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));

        let result = manager.upload_gallery(new_gallery("Trip", &[])).await;
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
        assert_eq!(manager.store().authorizations(), 0);
    }

    #[tokio::test]
    async fn test_upload_sorts_images() {
        let manager = GalleryManager::new(MemoryStore::default());
        let report = manager
            .upload_gallery(new_gallery("Trip", &["b.jpg", "a.jpg"]))
            .await
            .unwrap();

        assert!(report.gallery.id.starts_with("gallery-"));
        assert_eq!(report.gallery.image_files, vec!["a.jpg", "b.jpg"]);
        assert_eq!(report.gallery.folder_path, "galleries/Trip");
        assert!(manager.store().contains("galleries/Trip/a.jpg"));
        assert_eq!(manager.store().authorizations(), 1);
    }

    #[tokio::test]
    async fn test_all_failed_leaves_manifest_alone() {
        let store = MemoryStore::default();
        store.fail_on("galleries/Trip/a.jpg");
        let manager = GalleryManager::new(store);

        let result = manager.upload_gallery(new_gallery("Trip", &["a.jpg"])).await;
        assert!(matches!(result, Err(StorageError::NothingUploaded { failed: 1 })));
        assert!(!manager.store().contains("galleries.json"));
    }

    #[tokio::test]
    async fn test_edit_unknown_gallery() {
        let manager = GalleryManager::new(MemoryStore::default());
        let result = manager.edit_gallery("gallery-9", GalleryEdit::default()).await;
        assert!(matches!(
            result,
            Err(StorageError::Gallery(AppError::GalleryNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_gallery() {
        let manager = GalleryManager::new(MemoryStore::default());
        assert!(manager.delete_gallery("gallery-9").await.is_err());
    }

    #[test]
    fn test_gallery_edit_is_empty() {
        assert!(GalleryEdit::default().is_empty());
        let edit = GalleryEdit {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert!(!edit.is_empty());
    }
}
