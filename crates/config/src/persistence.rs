//! File system persistence for configuration
//!
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so the config file is never left half written. The previous file
//! is kept as `config.toml.backup`.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn backup_path(&self) -> PathBuf {
        self.config_path.with_extension("toml.backup")
    }

    /// Loads configuration from file
    ///
    /// A missing file yields the default config. An empty or unparsable
    /// file is an error. Validation problems are logged, not fatal, so a
    /// user can still fix the file by hand.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if config.version != CONFIG_VERSION {
            log::warn!(
                "Config version {} differs from supported version {}; reading it as version {}",
                config.version,
                CONFIG_VERSION,
                CONFIG_VERSION
            );
            config.version = CONFIG_VERSION;
        }

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings: {}",
                ConfigError::from_validation(&errors)
            );
        }

        Ok(config)
    }

    /// Validates, backs up the previous file, then writes atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            return Err(ConfigError::from_validation(&errors));
        }

        if let Some(parent) = self.config_path.parent() {
            self.ensure_directory_exists(parent)?;
        }

        if self.config_path.exists() {
            self.backup_config()?;
        }

        let toml_string = toml::to_string_pretty(config)?;

        let temp_file = self.create_temp_file()?;
        self.write_atomic(temp_file, &toml_string)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    fn ensure_directory_exists(&self, path: &Path) -> ConfigResult<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
                path: path.to_path_buf(),
                source: e,
            })?;
            log::info!("Created config directory: {}", path.display());
        }
        Ok(())
    }

    fn backup_config(&self) -> ConfigResult<()> {
        let backup_path = self.backup_path();
        fs::copy(&self.config_path, &backup_path)
            .map_err(|e| ConfigError::BackupError { source: e })?;
        log::debug!("Backed up config to {}", backup_path.display());
        Ok(())
    }

    fn create_temp_file(&self) -> ConfigResult<NamedTempFile> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Config path has no parent directory".to_string(),
            })?;

        NamedTempFile::new_in(dir).map_err(ConfigError::IoError)
    }

    fn write_atomic(&self, mut temp_file: NamedTempFile, content: &str) -> ConfigResult<()> {
        temp_file
            .write_all(content.as_bytes())
            .map_err(ConfigError::IoError)?;
        temp_file.flush().map_err(ConfigError::IoError)?;

        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        Ok(())
    }

    /// Writes the default config preceded by a short explanatory header
    pub fn generate_default_with_comments(&self) -> ConfigResult<()> {
        let default_config = Config::default();
        let body = toml::to_string_pretty(&default_config)?;
        let content = format!("{}\n{}", DEFAULT_HEADER, body);

        if let Some(parent) = self.config_path.parent() {
            self.ensure_directory_exists(parent)?;
        }
        let temp_file = self.create_temp_file()?;
        self.write_atomic(temp_file, &content)?;

        log::info!("Generated default config at {}", self.config_path.display());
        Ok(())
    }
}

const DEFAULT_HEADER: &str = "\
# Galleria configuration
#
# [storage] credentials may be left empty here and supplied through
# GALLERIA_STORAGE_KEY_ID, GALLERIA_STORAGE_APPLICATION_KEY and
# GALLERIA_STORAGE_BUCKET_ID instead.
";
