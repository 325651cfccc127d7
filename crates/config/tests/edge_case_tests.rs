//! Edge case and error scenario tests

use galleria_config::{Config, ConfigError, ConfigManager};
use std::fs;
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_corrupted_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "this is not valid TOML {{{")?;

    assert!(matches!(manager.load(), Err(ConfigError::ParseError { .. })));
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let nested_path = temp_dir.path().join("a").join("b").join("c");
    let manager = ConfigManager::with_directory(nested_path)?;

    manager.save(&Config::default())?;
    assert!(manager.config_path().exists());
    Ok(())
}

#[test]
fn test_invalid_values_load_with_warning() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(
        manager.config_path(),
        "[slideshow]\nspeed_levels_ms = []\n",
    )?;

    let config = manager.load()?;
    assert!(config.slideshow.speed_levels_ms.is_empty());
    assert!(!manager.validate()?.is_empty());
    Ok(())
}

#[test]
fn test_failed_save_keeps_previous_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let result = manager.update(|config| config.storage.manifest_name.clear());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_unknown_keys_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(
        manager.config_path(),
        "[app]\ncolor_scheme = \"dark\"\n[slideshow]\ninitial_speed_ms = 2000\n",
    )?;
    assert_eq!(manager.load()?.slideshow.initial_speed_ms, 2000);
    Ok(())
}
