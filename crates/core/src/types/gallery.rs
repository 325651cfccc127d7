//! Gallery domain model

use crate::types::{placeholder, UrlBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A list of labels that the manifest may store as a single string,
/// an array of strings, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LabelRepr", into = "Vec<String>")]
pub struct LabelList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Many(Vec<String>),
    One(String),
    Null,
}

impl From<LabelRepr> for LabelList {
    fn from(repr: LabelRepr) -> Self {
        match repr {
            LabelRepr::Many(items) => Self::new(items),
            LabelRepr::One(item) => Self::new(vec![item]),
            LabelRepr::Null => Self::default(),
        }
    }
}

impl From<LabelList> for Vec<String> {
    fn from(list: LabelList) -> Self {
        list.0
    }
}

impl LabelList {
    /// Creates a list, dropping blank entries and trimming the rest
    pub fn new(items: Vec<String>) -> Self {
        Self(
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for LabelList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for LabelList {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl<'a> From<Vec<&'a str>> for LabelList {
    fn from(items: Vec<&'a str>) -> Self {
        Self::new(items.into_iter().map(String::from).collect())
    }
}

/// One gallery record as stored in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub id: String,
    pub name: String,
    pub folder_path: String,
    #[serde(default)]
    pub character: LabelList,
    #[serde(default)]
    pub tags: LabelList,
    #[serde(default)]
    pub file_count: usize,
    #[serde(default)]
    pub image_files: Vec<String>,
}

impl Gallery {
    /// Creates a gallery whose folder is derived from its name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            folder_path: default_folder_path(&name),
            name,
            character: LabelList::default(),
            tags: LabelList::default(),
            file_count: 0,
            image_files: Vec::new(),
        }
    }

    /// Replaces the image list and keeps `file_count` in step with it
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.file_count = images.len();
        self.image_files = images;
        self
    }

    pub fn with_characters(mut self, characters: impl Into<LabelList>) -> Self {
        self.character = characters.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<LabelList>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Object key of an image inside the bucket
    pub fn object_key(&self, file: &str) -> String {
        UrlBuilder::join_path(&[&self.folder_path, file])
    }

    /// Object keys for every image, in display order
    pub fn object_keys(&self) -> Vec<String> {
        self.image_files.iter().map(|f| self.object_key(f)).collect()
    }

    /// Public URLs for every image, in display order
    pub fn image_urls(&self, urls: &UrlBuilder) -> Vec<String> {
        self.image_files
            .iter()
            .map(|f| urls.join(&[&self.folder_path, f]))
            .collect()
    }

    /// URL of the cover image (the first image), if any
    pub fn cover_url(&self, urls: &UrlBuilder) -> Option<String> {
        self.image_files
            .first()
            .map(|f| urls.join(&[&self.folder_path, f]))
    }

    pub fn has_character(&self, character: &str) -> bool {
        self.character.contains(character)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Placeholder colour shown while the cover loads
    pub fn placeholder_color(&self) -> &'static str {
        placeholder::color_for_id(&self.id)
    }

    /// Short initials shown on the placeholder
    pub fn initials(&self) -> String {
        placeholder::initials(&self.name)
    }

    /// The subset the slideshow needs to open this gallery
    pub fn to_slideshow_source(&self, urls: &UrlBuilder) -> SlideshowSource {
        SlideshowSource {
            id: self.id.clone(),
            name: Some(self.name.clone()).filter(|n| !n.is_empty()),
            image_urls: self.image_urls(urls),
        }
    }
}

/// Default bucket folder for a gallery name
pub fn default_folder_path(name: &str) -> String {
    format!("galleries/{}", name)
}

/// What a slideshow consumes: an ordered list of image URLs plus an
/// optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowSource {
    pub id: String,
    pub name: Option<String>,
    pub image_urls: Vec<String>,
}

impl SlideshowSource {
    pub fn new(id: impl Into<String>, image_urls: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            image_urls,
        }
    }

    pub fn len(&self) -> usize {
        self.image_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Gallery {
        Gallery::new("gallery-3", "Summer Trip")
            .with_images(vec!["01.jpg".into(), "02.jpg".into()])
            .with_characters(vec!["Alice"])
            .with_tags(vec!["beach", " ", "sunset"])
    }

    #[test]
    fn test_new_derives_folder() {
        let g = Gallery::new("gallery-1", "Cats");
        assert_eq!(g.folder_path, "galleries/Cats");
        assert_eq!(g.file_count, 0);
    }

    #[test]
    fn test_label_list_drops_blanks() {
        let g = sample();
        assert_eq!(&*g.tags, &["beach".to_string(), "sunset".to_string()]);
        assert!(g.has_tag("sunset"));
        assert!(!g.has_tag(" "));
    }

    #[test]
    fn test_image_urls_in_order() {
        let urls = UrlBuilder::new("https://cdn.example.com/file/bucket/");
        let g = sample();
        assert_eq!(
            g.image_urls(&urls),
            vec![
                "https://cdn.example.com/file/bucket/galleries/Summer Trip/01.jpg",
                "https://cdn.example.com/file/bucket/galleries/Summer Trip/02.jpg",
            ]
        );
        assert_eq!(
            g.cover_url(&urls).as_deref(),
            Some("https://cdn.example.com/file/bucket/galleries/Summer Trip/01.jpg")
        );
    }

    #[test]
    fn test_cover_url_empty_gallery() {
        let urls = UrlBuilder::new("https://cdn.example.com/");
        assert!(Gallery::new("gallery-1", "Empty").cover_url(&urls).is_none());
    }

    #[test]
    fn test_object_keys() {
        let g = sample();
        assert_eq!(
            g.object_keys(),
            vec!["galleries/Summer Trip/01.jpg", "galleries/Summer Trip/02.jpg"]
        );
    }

    #[test]
    fn test_character_accepts_string_or_array() {
        let one: Gallery = serde_json::from_str(
            r#"{"id":"a","name":"n","folderPath":"f","character":"Bob"}"#,
        )
        .unwrap();
        assert!(one.has_character("Bob"));

        let many: Gallery = serde_json::from_str(
            r#"{"id":"a","name":"n","folderPath":"f","character":["Bob","Eve"]}"#,
        )
        .unwrap();
        assert_eq!(many.character.len(), 2);

        let none: Gallery = serde_json::from_str(
            r#"{"id":"a","name":"n","folderPath":"f","character":null}"#,
        )
        .unwrap();
        assert!(none.character.is_empty());
    }

    #[test]
    fn test_serializes_camel_case_arrays() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["folderPath"], "galleries/Summer Trip");
        assert_eq!(json["fileCount"], 2);
        assert_eq!(json["character"], serde_json::json!(["Alice"]));
    }

    #[test]
    fn test_slideshow_source() {
        let urls = UrlBuilder::new("https://cdn.example.com");
        let source = sample().to_slideshow_source(&urls);
        assert_eq!(source.id, "gallery-3");
        assert_eq!(source.name.as_deref(), Some("Summer Trip"));
        assert_eq!(source.len(), 2);
    }
}
