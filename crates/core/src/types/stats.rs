//! Library statistics

use crate::types::Gallery;
use serde::{Deserialize, Serialize};

/// Totals shown in the library header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_galleries: usize,
    pub total_images: usize,
}

impl LibraryStats {
    /// Creates empty statistics
    pub fn empty() -> Self {
        Self::default()
    }

    /// Counts galleries and sums their declared file counts
    pub fn from_galleries(galleries: &[Gallery]) -> Self {
        Self {
            total_galleries: galleries.len(),
            total_images: galleries.iter().map(|g| g.file_count).sum(),
        }
    }

    /// Returns the average number of images per gallery
    pub fn average_images(&self) -> f64 {
        if self.total_galleries == 0 {
            return 0.0;
        }
        self.total_images as f64 / self.total_galleries as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = LibraryStats::empty();
        assert_eq!(stats.total_galleries, 0);
        assert_eq!(stats.average_images(), 0.0);
    }

    #[test]
    fn test_sums_file_counts() {
        let galleries = vec![
            Gallery::new("gallery-1", "a").with_images(vec!["1.jpg".into(), "2.jpg".into()]),
            Gallery::new("gallery-2", "b").with_images(vec!["1.jpg".into()]),
        ];
        let stats = LibraryStats::from_galleries(&galleries);
        assert_eq!(stats.total_galleries, 2);
        assert_eq!(stats.total_images, 3);
        assert_eq!(stats.average_images(), 1.5);
    }
}
