//! The `galleries.json` manifest

use crate::error::{AppError, Result};
use crate::types::gallery::default_folder_path;
use crate::types::{Gallery, GalleryFilter, LabelList, LibraryStats, TagIndex};
use serde::Deserialize;
use serde_json::Value;

/// Gallery entry as it may appear in a hand-edited manifest: every field
/// optional, normalized into a [`Gallery`] by [`Manifest::from_json`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawGallery {
    id: Option<String>,
    name: Option<String>,
    folder_path: Option<String>,
    character: LabelList,
    tags: LabelList,
    file_count: Option<serde_json::Number>,
    image_files: Option<Vec<String>>,
}

impl RawGallery {
    fn normalize(self, index: usize) -> Gallery {
        let name = self.name.unwrap_or_default();
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("gallery-{}", index + 1));
        let folder_path = self
            .folder_path
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_folder_path(&name));
        let image_files = self.image_files.unwrap_or_default();
        let file_count = self
            .file_count
            .and_then(|n| n.as_u64())
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(image_files.len());

        Gallery {
            id,
            name,
            folder_path,
            character: self.character,
            tags: self.tags,
            file_count,
            image_files,
        }
    }
}

/// Ordered collection of galleries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    galleries: Vec<Gallery>,
}

impl Manifest {
    pub fn new(galleries: Vec<Gallery>) -> Self {
        Self { galleries }
    }

    /// Parses manifest text.
    ///
    /// Accepts either an array of galleries or an object whose values are
    /// galleries (in document order). Each entry is normalized.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let entries: Vec<Value> = match value {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            other => {
                return Err(AppError::InvalidManifest {
                    reason: format!("expected an array or object, got {}", json_kind(&other)),
                })
            }
        };

        let galleries = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                RawGallery::deserialize(entry)
                    .map(|raw| raw.normalize(i))
                    .map_err(|e| AppError::InvalidManifest {
                        reason: format!("entry {}: {}", i, e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Parsed manifest with {} galleries", galleries.len());
        Ok(Self { galleries })
    }

    /// Pretty-printed JSON array, as written back to storage
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.galleries)
            .map_err(|source| AppError::ManifestSerialize { source })
    }

    pub fn galleries(&self) -> &[Gallery] {
        &self.galleries
    }

    pub fn into_galleries(self) -> Vec<Gallery> {
        self.galleries
    }

    pub fn len(&self) -> usize {
        self.galleries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galleries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Gallery> {
        self.galleries.iter().find(|g| g.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Gallery> {
        self.galleries.iter_mut().find(|g| g.id == id)
    }

    /// Like [`find`](Self::find) but an unknown id is an error
    pub fn get(&self, id: &str) -> Result<&Gallery> {
        self.find(id).ok_or_else(|| AppError::GalleryNotFound { id: id.to_string() })
    }

    pub fn push(&mut self, gallery: Gallery) {
        self.galleries.push(gallery);
    }

    pub fn remove(&mut self, id: &str) -> Option<Gallery> {
        let pos = self.galleries.iter().position(|g| g.id == id)?;
        Some(self.galleries.remove(pos))
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_galleries(&self.galleries)
    }

    pub fn tag_index(&self) -> TagIndex {
        TagIndex::from_galleries(&self.galleries)
    }

    pub fn filter(&self, filter: &GalleryFilter) -> Vec<&Gallery> {
        filter.apply(&self.galleries)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
