//! Domain types for Galleria
//!
//! - `gallery`: gallery records and the slideshow source derived from them
//! - `manifest`: parsing and normalizing `galleries.json`
//! - `url`: public URL construction
//! - `filter`: character/tag filtering and vocabularies
//! - `stats`: library totals
//! - `placeholder`: colour and initials for cover placeholders

mod filter;
mod gallery;
mod manifest;
pub mod placeholder;
mod stats;
mod url;

pub use filter::{parse_tag_list, GalleryFilter, TagIndex};
pub use gallery::{default_folder_path, Gallery, LabelList, SlideshowSource};
pub use manifest::Manifest;
pub use stats::LibraryStats;
pub use url::UrlBuilder;
