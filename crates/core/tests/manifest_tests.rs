//! Manifest loading and derived views, exercised through the public API

use galleria_core::types::placeholder::{self, PLACEHOLDER_COLORS};
use galleria_core::{GalleryFilter, Manifest, UrlBuilder};
use proptest::prelude::*;

const MANIFEST: &str = r#"
{
    "first": {
        "id": "gallery-1",
        "name": "Spring Festival",
        "character": "Alice",
        "tags": ["outdoor", "festival"],
        "imageFiles": ["01.jpg", "02.jpg", "03.jpg"]
    },
    "second": {
        "name": "夜景",
        "character": ["Bob", "Alice"],
        "tags": ["night"],
        "fileCount": 12,
        "imageFiles": ["a.png"]
    }
}
"#;

#[test]
fn test_object_manifest_end_to_end() {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    assert_eq!(manifest.len(), 2);

    let second = &manifest.galleries()[1];
    assert_eq!(second.id, "gallery-2");
    assert_eq!(second.folder_path, "galleries/夜景");
    assert_eq!(second.file_count, 12);
    assert_eq!(second.initials(), "夜景");

    let stats = manifest.stats();
    assert_eq!(stats.total_galleries, 2);
    assert_eq!(stats.total_images, 15);

    let index = manifest.tag_index();
    assert_eq!(index.characters, vec!["Alice", "Bob"]);
    assert_eq!(index.tags, vec!["festival", "night", "outdoor"]);
}

#[test]
fn test_filter_and_covers() {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let urls = UrlBuilder::new("https://f005.example.com/file/gallery-bucket/");

    let filter = GalleryFilter::new().with_character("Alice").with_tag("night");
    let matched = manifest.filter(&filter);
    assert_eq!(matched.len(), 1);
    assert_eq!(
        matched[0].cover_url(&urls).as_deref(),
        Some("https://f005.example.com/file/gallery-bucket/galleries/夜景/a.png")
    );
}

#[test]
fn test_rewritten_manifest_reloads_identically() {
    let manifest = Manifest::from_json(MANIFEST).unwrap();
    let text = manifest.to_json_pretty().unwrap();
    assert_eq!(Manifest::from_json(&text).unwrap(), manifest);
}

proptest! {
    #[test]
    fn prop_color_always_in_palette(id in ".*") {
        prop_assert!(PLACEHOLDER_COLORS.contains(&placeholder::color_for_id(&id)));
    }

    #[test]
    fn prop_initials_never_empty(name in ".*") {
        prop_assert!(!placeholder::initials(&name).is_empty());
    }

    #[test]
    fn prop_join_never_doubles_slashes(segments in proptest::collection::vec("[a-z/]{0,6}", 0..5)) {
        let urls = UrlBuilder::new("https://cdn.test/");
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let url = urls.join(&refs);
        prop_assert!(url.starts_with("https://cdn.test/"));
        prop_assert!(!url["https://".len()..].contains("//"));
    }
}
