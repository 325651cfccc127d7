//! Galleria Configuration System
//!
//! TOML configuration with one validated section per concern. New sections
//! implement [`ConfigSection`] and are added to [`Config`].
//!
//! # Example
//!
//! ```rust,no_run
//! use galleria_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load_or_default();
//! println!("Initial speed: {}ms", config.slideshow.initial_speed_ms);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
mod slideshow_config;
mod storage_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{apply_env_overrides, ConfigManager};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use slideshow_config::SlideshowConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Slideshow timing
    pub slideshow: SlideshowConfig,

    /// Object storage credentials and endpoints
    pub storage: StorageConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all problems found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.slideshow.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.storage.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges `other` into this config, preferring its values
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.slideshow.merge(other.slideshow);
        self.storage.merge(other.storage);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            slideshow: SlideshowConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_version_is_set() {
        assert_eq!(Config::default().version, CONFIG_VERSION);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        let mut override_config = Config::default();
        override_config.slideshow.initial_speed_ms = 2000;

        base.merge(override_config);
        assert_eq!(base.slideshow.initial_speed_ms, 2000);
    }

    #[test]
    fn test_validation_collects_across_sections() {
        let mut config = Config::default();
        config.slideshow.frame_interval_ms = 0;
        config.storage.request_timeout_secs = 0;
        assert_eq!(config.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[storage]\nbucket_name = \"b\"\n").unwrap();
        assert_eq!(config.storage.bucket_name, "b");
        assert_eq!(config.storage.manifest_name, "galleries.json");
        assert_eq!(config.slideshow, SlideshowConfig::default());
    }
}
