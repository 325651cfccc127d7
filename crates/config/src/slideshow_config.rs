//! Slideshow configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Auto-advance settings for the slideshow viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Allowed auto-advance intervals in milliseconds, fastest first
    pub speed_levels_ms: Vec<u64>,

    /// Interval used when a slideshow first opens; must be one of the levels
    pub initial_speed_ms: u64,

    /// How often the terminal viewer redraws the progress bar
    pub frame_interval_ms: u64,
}

impl SlideshowConfig {
    pub const MIN_SPEED_MS: u64 = 100;
    pub const MAX_SPEED_MS: u64 = 600_000;
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            speed_levels_ms: vec![
                1000, 2000, 4000, 6000, 8000, 10000, 12000, 14000, 16000, 18000, 20000,
            ],
            initial_speed_ms: 10_000,
            frame_interval_ms: 33,
        }
    }
}

impl ConfigSection for SlideshowConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::strictly_ascending(&self.speed_levels_ms, "slideshow.speed_levels_ms"),
            Validator::in_range(self.frame_interval_ms, 16, 1000, "slideshow.frame_interval_ms"),
        ];

        for level in &self.speed_levels_ms {
            results.push(Validator::in_range(
                *level,
                Self::MIN_SPEED_MS,
                Self::MAX_SPEED_MS,
                "slideshow.speed_levels_ms",
            ));
        }

        if !self.speed_levels_ms.is_empty() {
            results.push(Validator::one_of(
                &self.initial_speed_ms,
                &self.speed_levels_ms,
                "slideshow.initial_speed_ms",
            ));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.speed_levels_ms = other.speed_levels_ms;
        self.initial_speed_ms = other.initial_speed_ms;
        self.frame_interval_ms = other.frame_interval_ms;
    }

    fn section_name(&self) -> &'static str {
        "slideshow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SlideshowConfig::default().validate().is_ok());
    }

    #[test]
    fn test_initial_speed_must_be_a_level() {
        let config = SlideshowConfig {
            initial_speed_ms: 3000,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "slideshow.initial_speed_ms");
    }

    #[test]
    fn test_levels_must_ascend() {
        let config = SlideshowConfig {
            speed_levels_ms: vec![2000, 1000],
            initial_speed_ms: 2000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_bounds() {
        let config = SlideshowConfig {
            speed_levels_ms: vec![50, 1000],
            initial_speed_ms: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_interval_bounds() {
        let config = SlideshowConfig {
            frame_interval_ms: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
