//! Configuration manager - main API for config operations

use crate::app_config::LogLevel;
use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, StorageConfig};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Main configuration manager
///
/// Owns the config directory and delegates file handling to
/// [`ConfigPersistence`].
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// - Linux: `~/.config/galleria/`
    /// - macOS: `~/Library/Application Support/galleria/`
    /// - Windows: `%APPDATA%\galleria\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let config_path = config_dir.join("config.toml");
        let persistence = ConfigPersistence::new(config_path);

        Ok(Self {
            persistence,
            config_dir,
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "galleria")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Loads the configuration; a missing file yields defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and atomically saves the configuration
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn`, and saves
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a commented default config if none exists.
    ///
    /// Returns Ok(true) if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.persistence.generate_default_with_comments()?;
        Ok(true)
    }

    /// Overwrites the config file with defaults
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Returns every validation problem in the current file
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the file, then applies `GALLERIA_SECTION_FIELD` environment
    /// overrides (e.g. `GALLERIA_STORAGE_KEY_ID`).
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {}",
                ConfigError::from_validation(&errors)
            );
        }

        Ok(config)
    }
}

/// Applies overrides from `lookup`, which maps a variable name to its value.
///
/// Unparsable numeric or log-level values are ignored with a warning.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let strings: [(&str, &mut String); 5] = [
        (StorageConfig::ENV_KEY_ID, &mut config.storage.key_id),
        (
            StorageConfig::ENV_APPLICATION_KEY,
            &mut config.storage.application_key,
        ),
        (StorageConfig::ENV_BUCKET_ID, &mut config.storage.bucket_id),
        (StorageConfig::ENV_BUCKET_NAME, &mut config.storage.bucket_name),
        (
            StorageConfig::ENV_DOWNLOAD_BASE_URL,
            &mut config.storage.download_base_url,
        ),
    ];

    for (name, target) in strings {
        if let Some(value) = lookup(name) {
            log::debug!("Applying override from {}", name);
            *target = value;
        }
    }

    if let Some(value) = lookup("GALLERIA_SLIDESHOW_INITIAL_SPEED_MS") {
        match value.parse::<u64>() {
            Ok(ms) => config.slideshow.initial_speed_ms = ms,
            Err(_) => log::warn!(
                "Ignoring GALLERIA_SLIDESHOW_INITIAL_SPEED_MS={}: not a number",
                value
            ),
        }
    }

    if let Some(value) = lookup("GALLERIA_APP_LOG_LEVEL") {
        match value.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring GALLERIA_APP_LOG_LEVEL: {}", e),
        }
    }
}
