//! Integration tests for the configuration system

use galleria_config::{apply_env_overrides, Config, ConfigManager, LogLevel};
use std::collections::HashMap;
use tempfile::TempDir;

fn setup() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup()?;

    assert!(manager.initialize()?);
    let mut config = manager.load()?;
    assert_eq!(config, Config::default());

    config.storage.bucket_name = "gallery-bucket".to_string();
    config.storage.download_base_url =
        "https://f005.backblazeb2.com/file/gallery-bucket/".to_string();
    config.slideshow.speed_levels_ms = vec![500, 1500, 3000];
    config.slideshow.initial_speed_ms = 1500;
    manager.save(&config)?;

    let loaded = manager.load()?;
    assert_eq!(loaded, config);
    assert!(manager.validate()?.is_empty());
    Ok(())
}

#[test]
fn test_hand_written_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup()?;
    std::fs::write(
        manager.config_path(),
        r#"
[app]
log_level = "warn"

[slideshow]
speed_levels_ms = [2000, 4000]
initial_speed_ms = 4000

[storage]
bucket_name = "pics"
request_timeout_secs = 10
"#,
    )?;

    let config = manager.load()?;
    assert_eq!(config.app.log_level, LogLevel::Warn);
    assert_eq!(config.slideshow.initial_speed_ms, 4000);
    assert_eq!(config.slideshow.frame_interval_ms, 33);
    assert_eq!(config.storage.request_timeout_secs, 10);
    assert_eq!(config.storage.api_url, "https://api.backblazeb2.com");
    Ok(())
}

#[test]
fn test_env_credentials_satisfy_requirements() {
    let vars: HashMap<&str, &str> = [
        ("GALLERIA_STORAGE_KEY_ID", "k"),
        ("GALLERIA_STORAGE_APPLICATION_KEY", "secret"),
        ("GALLERIA_STORAGE_BUCKET_ID", "b"),
    ]
    .into_iter()
    .collect();

    let mut config = Config::default();
    assert!(config.storage.require_credentials().is_err());
    apply_env_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));
    assert!(config.storage.require_credentials().is_ok());
}
