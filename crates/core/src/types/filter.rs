//! Character/tag filtering for the gallery grid

use crate::types::Gallery;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Active filter selection.
///
/// Selections within one category are OR-ed, the two categories are AND-ed,
/// and an empty category matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    characters: BTreeSet<String>,
    tags: BTreeSet<String>,
}

impl GalleryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.characters.insert(character.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds the character if absent, removes it if present
    pub fn toggle_character(&mut self, character: &str) {
        if !self.characters.remove(character) {
            self.characters.insert(character.to_string());
        }
    }

    /// Adds the tag if absent, removes it if present
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.characters.clear();
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.tags.is_empty()
    }

    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn matches(&self, gallery: &Gallery) -> bool {
        let character_ok = self.characters.is_empty()
            || gallery.character.iter().any(|c| self.characters.contains(c));
        let tag_ok =
            self.tags.is_empty() || gallery.tags.iter().any(|t| self.tags.contains(t));
        character_ok && tag_ok
    }

    /// Galleries passing the filter, in manifest order
    pub fn apply<'a>(&self, galleries: &'a [Gallery]) -> Vec<&'a Gallery> {
        galleries.iter().filter(|g| self.matches(g)).collect()
    }
}

/// Sorted vocabularies offered as filter choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagIndex {
    pub characters: Vec<String>,
    pub tags: Vec<String>,
}

impl TagIndex {
    pub fn from_galleries(galleries: &[Gallery]) -> Self {
        let mut characters = BTreeSet::new();
        let mut tags = BTreeSet::new();

        for gallery in galleries {
            characters.extend(gallery.character.iter().cloned());
            tags.extend(gallery.tags.iter().cloned());
        }

        Self {
            characters: characters.into_iter().collect(),
            tags: tags.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.tags.is_empty()
    }
}

/// Splits a comma separated input such as `"a, b,,c"` into labels
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
