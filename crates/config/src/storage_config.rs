//! Object storage configuration section

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Bucket credentials and endpoints.
///
/// Credentials default to empty; read-only browsing only needs
/// `download_base_url`, while uploads and deletes need the key pair and
/// bucket id (see [`StorageConfig::require_credentials`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub key_id: String,
    pub application_key: String,
    pub bucket_id: String,
    pub bucket_name: String,

    /// Public base for downloads, e.g. `https://f005.backblazeb2.com/file/<bucket>/`.
    /// When empty it is derived from the authorized download URL and bucket name.
    pub download_base_url: String,

    /// Account API endpoint used for authorization
    pub api_url: String,

    /// Object name of the manifest at the bucket root
    pub manifest_name: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl StorageConfig {
    /// Environment variables that can supply each credential
    pub const ENV_KEY_ID: &'static str = "GALLERIA_STORAGE_KEY_ID";
    pub const ENV_APPLICATION_KEY: &'static str = "GALLERIA_STORAGE_APPLICATION_KEY";
    pub const ENV_BUCKET_ID: &'static str = "GALLERIA_STORAGE_BUCKET_ID";
    pub const ENV_BUCKET_NAME: &'static str = "GALLERIA_STORAGE_BUCKET_NAME";
    pub const ENV_DOWNLOAD_BASE_URL: &'static str = "GALLERIA_STORAGE_DOWNLOAD_BASE_URL";

    /// Checks the settings needed for authenticated operations
    pub fn require_credentials(&self) -> ConfigResult<()> {
        let required = [
            ("storage.key_id", &self.key_id, Self::ENV_KEY_ID),
            (
                "storage.application_key",
                &self.application_key,
                Self::ENV_APPLICATION_KEY,
            ),
            ("storage.bucket_id", &self.bucket_id, Self::ENV_BUCKET_ID),
        ];

        for (field, value, env_var) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingSetting {
                    field: field.to_string(),
                    env_var: env_var.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Checks that public downloads can be addressed
    pub fn require_download_base(&self) -> ConfigResult<()> {
        if self.download_base_url.trim().is_empty() && self.bucket_name.trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                field: "storage.download_base_url".to_string(),
                env_var: Self::ENV_DOWNLOAD_BASE_URL.to_string(),
            });
        }
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.require_credentials().is_ok()
    }

    /// Copy safe to print: the application key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.application_key.is_empty() {
            let visible: String = copy.application_key.chars().take(4).collect();
            copy.application_key = format!("{}****", visible);
        }
        copy
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            application_key: String::new(),
            bucket_id: String::new(),
            bucket_name: String::new(),
            download_base_url: String::new(),
            api_url: "https://api.backblazeb2.com".to_string(),
            manifest_name: "galleries.json".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let results = vec![
            Validator::not_empty(&self.api_url, "storage.api_url"),
            Validator::http_url(&self.api_url, "storage.api_url"),
            Validator::http_url(&self.download_base_url, "storage.download_base_url"),
            Validator::not_empty(&self.manifest_name, "storage.manifest_name"),
            Validator::in_range(
                self.request_timeout_secs,
                1,
                600,
                "storage.request_timeout_secs",
            ),
        ];

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        *self = other;
    }

    fn section_name(&self) -> &'static str {
        "storage"
    }
}
