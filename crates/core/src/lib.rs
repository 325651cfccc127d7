//! Galleria core - gallery manifest model shared by the slideshow,
//! storage and CLI crates

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::{
    default_folder_path, parse_tag_list, Gallery, GalleryFilter, LabelList, LibraryStats,
    Manifest, SlideshowSource, TagIndex, UrlBuilder,
};
