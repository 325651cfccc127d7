// crates/storage/src/store.rs
//! Object store abstraction
//!
//! [`GalleryManager`](crate::GalleryManager) only needs a handful of bucket
//! operations. [`B2Client`](crate::B2Client) implements them against the
//! real API and [`MemoryStore`] keeps everything in process.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use galleria_core::Manifest;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Content type that asks the bucket to detect the type itself
pub const AUTO_CONTENT_TYPE: &str = "b2/x-auto";

/// An object to be written to the bucket
#[derive(Debug, Clone)]
pub struct UploadObject {
    /// Full object name, e.g. `galleries/Summer/001.jpg`
    pub name: String,
    pub data: Bytes,
    /// MIME type; `None` means [`AUTO_CONTENT_TYPE`]
    pub content_type: Option<String>,
    /// Source file modification time in Unix milliseconds
    pub last_modified_millis: Option<i64>,
}

impl UploadObject {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
            last_modified_millis: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_last_modified(mut self, millis: i64) -> Self {
        self.last_modified_millis = Some(millis);
        self
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(AUTO_CONTENT_TYPE)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Identifies an object after upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_id: String,
    pub file_name: String,
}

/// Bucket operations used by the gallery manager
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Establishes (or refreshes) an authorized session
    async fn authorize(&self) -> StorageResult<()>;

    /// Writes one object, replacing any visible object of the same name
    async fn upload(&self, object: UploadObject) -> StorageResult<StoredFile>;

    /// Deletes the object whose name matches exactly
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// Reads the manifest; a missing manifest is an empty one
    async fn read_manifest(&self) -> StorageResult<Manifest>;

    /// Replaces the manifest
    async fn write_manifest(&self, manifest: &Manifest) -> StorageResult<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, UploadObject>,
    failing: BTreeSet<String>,
    next_id: u64,
    authorizations: usize,
}

/// In-process store with the same semantics as the bucket
#[derive(Debug)]
pub struct MemoryStore {
    manifest_name: String,
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("galleries.json")
    }
}

impl MemoryStore {
    pub fn new(manifest_name: impl Into<String>) -> Self {
        Self {
            manifest_name: manifest_name.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Makes every upload or delete of `name` fail
    pub fn fail_on(&self, name: impl Into<String>) {
        self.lock().failing.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().objects.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<UploadObject> {
        self.lock().objects.get(name).cloned()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn authorizations(&self) -> usize {
        self.lock().authorizations
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_failing(state: &MemoryState, name: &str) -> StorageResult<()> {
        if state.failing.contains(name) {
            return Err(StorageError::Api {
                status: 503,
                code: "service_unavailable".to_string(),
                message: format!("simulated failure for {}", name),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn authorize(&self) -> StorageResult<()> {
        self.lock().authorizations += 1;
        Ok(())
    }

    async fn upload(&self, object: UploadObject) -> StorageResult<StoredFile> {
        let mut state = self.lock();
        Self::check_failing(&state, &object.name)?;

        state.next_id += 1;
        let stored = StoredFile {
            file_id: format!("mem-{}", state.next_id),
            file_name: object.name.clone(),
        };
        state.objects.insert(object.name.clone(), object);
        Ok(stored)
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let mut state = self.lock();
        Self::check_failing(&state, name)?;

        state
            .objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))
    }

    async fn read_manifest(&self) -> StorageResult<Manifest> {
        let state = self.lock();
        match state.objects.get(&self.manifest_name) {
            Some(object) => {
                let text = String::from_utf8_lossy(&object.data);
                Ok(Manifest::from_json(&text)?)
            }
            None => Ok(Manifest::default()),
        }
    }

    async fn write_manifest(&self, manifest: &Manifest) -> StorageResult<()> {
        let json = manifest.to_json_pretty()?;
        let object = UploadObject::new(self.manifest_name.clone(), json.into_bytes())
            .with_content_type("application/json");
        self.upload(object).await.map(|_| ())
    }
}
