// crates/storage/src/lib.rs
//! Object storage for Galleria
//!
//! A [`B2Client`] talks to a Backblaze B2 bucket holding the gallery images
//! and the `galleries.json` manifest. [`GalleryManager`] builds upload, edit
//! and delete on top of any [`ObjectStore`].

mod b2;
mod client;
mod error;
mod local;
mod manager;
mod progress;
mod store;

pub use b2::{encode_file_name, sha1_hex, B2Client, B2Settings, ConnectionReport};
pub use client::{ClientConfig, HttpClient};
pub use error::{StorageError, StorageResult};
pub use local::{content_type_for, is_image_file, LocalImage};
pub use manager::{DeleteReport, GalleryEdit, GalleryManager, NewGallery, UploadReport};
pub use progress::{ProgressCallback, UploadProgress};
pub use store::{MemoryStore, ObjectStore, StoredFile, UploadObject, AUTO_CONTENT_TYPE};
