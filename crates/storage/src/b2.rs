// crates/storage/src/b2.rs
//! Backblaze B2 native API client (v2)
//!
//! Authorization yields an account token, the API host and the download
//! host. Uploads go through a separate upload URL with its own token, which
//! is cached until an upload fails.

use crate::client::{ClientConfig, HttpClient};
use crate::error::{StorageError, StorageResult};
use crate::store::{ObjectStore, StoredFile, UploadObject};
use async_trait::async_trait;
use galleria_core::{Manifest, UrlBuilder};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Characters left as-is in file name headers; everything else is escaped
const FILE_NAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Connection settings for one bucket
#[derive(Debug, Clone)]
pub struct B2Settings {
    pub key_id: String,
    pub application_key: String,
    pub bucket_id: String,
    pub bucket_name: String,
    /// Account API endpoint, e.g. `https://api.backblazeb2.com`
    pub api_url: String,
    /// Explicit public download base; derived after authorization when `None`
    pub download_base_url: Option<String>,
    pub manifest_name: String,
    pub timeout: Duration,
}

impl Default for B2Settings {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            application_key: String::new(),
            bucket_id: String::new(),
            bucket_name: String::new(),
            api_url: "https://api.backblazeb2.com".to_string(),
            download_base_url: None,
            manifest_name: "galleries.json".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of [`B2Client::test_connection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub api_url: String,
    pub download_url: String,
    pub download_base: String,
    /// Galleries in the manifest, or `None` if no manifest exists yet
    pub manifest_galleries: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    authorization_token: String,
    api_url: String,
    download_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadTarget {
    upload_url: String,
    authorization_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileVersion {
    file_id: String,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileVersion>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Client for a single B2 bucket
pub struct B2Client {
    http: HttpClient,
    settings: B2Settings,
    session: RwLock<Option<Session>>,
    upload_target: Mutex<Option<UploadTarget>>,
}

impl B2Client {
    pub fn new(settings: B2Settings) -> StorageResult<Self> {
        let http = HttpClient::with_config(ClientConfig::default().with_timeout(settings.timeout))?;
        Ok(Self {
            http,
            settings,
            session: RwLock::new(None),
            upload_target: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &B2Settings {
        &self.settings
    }

    /// Authorizes the account and caches the session
    pub async fn authorize_account(&self) -> StorageResult<()> {
        let url = format!(
            "{}/b2api/v2/b2_authorize_account",
            self.settings.api_url.trim_end_matches('/')
        );
        log::debug!("Authorizing storage account at {}", url);

        let response = self
            .http
            .inner()
            .get(&url)
            .basic_auth(&self.settings.key_id, Some(&self.settings.application_key))
            .send()
            .await?;
        let session: Session = check(response).await?.json().await?;

        log::info!("Storage authorized (api: {})", session.api_url);
        *self.session.write().await = Some(session);
        *self.upload_target.lock().await = None;
        Ok(())
    }

    async fn session(&self) -> StorageResult<Session> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }
        self.authorize_account().await?;
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| StorageError::InvalidResponse("authorization left no session".into()))
    }

    async fn api_post<T: for<'de> Deserialize<'de>>(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> StorageResult<T> {
        let session = self.session().await?;
        let url = format!("{}/b2api/v2/{}", session.api_url, operation);

        let response = self
            .http
            .inner()
            .post(&url)
            .header("Authorization", &session.authorization_token)
            .json(&body)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Requests a fresh upload URL and token
    pub async fn get_upload_url(&self) -> StorageResult<()> {
        let target: UploadTarget = self
            .api_post(
                "b2_get_upload_url",
                serde_json::json!({ "bucketId": self.settings.bucket_id }),
            )
            .await?;
        log::debug!("Obtained upload URL");
        *self.upload_target.lock().await = Some(target);
        Ok(())
    }

    async fn upload_target(&self) -> StorageResult<UploadTarget> {
        if let Some(target) = self.upload_target.lock().await.as_ref() {
            return Ok(target.clone());
        }
        self.get_upload_url().await?;
        self.upload_target
            .lock()
            .await
            .clone()
            .ok_or_else(|| StorageError::InvalidResponse("no upload URL issued".into()))
    }

    /// Uploads one object with its SHA-1 checksum
    pub async fn upload_file(&self, object: UploadObject) -> StorageResult<StoredFile> {
        let target = self.upload_target().await?;
        let last_modified = object
            .last_modified_millis
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

        log::debug!("Uploading {} ({} bytes)", object.name, object.size());
        let result = self
            .http
            .inner()
            .post(&target.upload_url)
            .header("Authorization", &target.authorization_token)
            .header("X-Bz-File-Name", encode_file_name(&object.name))
            .header("Content-Type", object.content_type())
            .header("X-Bz-Content-Sha1", sha1_hex(&object.data))
            .header("X-Bz-Info-src_last_modified_millis", last_modified.to_string())
            .body(object.data.clone())
            .send()
            .await;

        let uploaded = match result {
            Ok(response) => check(response).await,
            Err(e) => Err(e.into()),
        };

        match uploaded {
            Ok(response) => {
                let file: FileVersion = response.json().await?;
                log::info!("Uploaded {}", file.file_name);
                Ok(StoredFile {
                    file_id: file.file_id,
                    file_name: file.file_name,
                })
            }
            Err(e) => {
                // Upload tokens are single-use on failure
                *self.upload_target.lock().await = None;
                Err(e)
            }
        }
    }

    /// Deletes the current version of the object named exactly `name`
    pub async fn delete_file(&self, name: &str) -> StorageResult<()> {
        let list: FileList = self
            .api_post(
                "b2_list_file_names",
                serde_json::json!({
                    "bucketId": self.settings.bucket_id,
                    "startFileName": name,
                    "maxFileCount": 1,
                }),
            )
            .await?;

        let file = list
            .files
            .into_iter()
            .find(|f| f.file_name == name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        let _: serde_json::Value = self
            .api_post(
                "b2_delete_file_version",
                serde_json::json!({ "fileName": file.file_name, "fileId": file.file_id }),
            )
            .await?;

        log::info!("Deleted {}", name);
        Ok(())
    }

    /// Public base URL for downloads
    pub async fn download_base(&self) -> StorageResult<UrlBuilder> {
        if let Some(base) = &self.settings.download_base_url {
            return Ok(UrlBuilder::new(base.clone()));
        }
        let session = self.session().await?;
        Ok(UrlBuilder::new(derive_download_base(
            &session.download_url,
            &self.settings.bucket_name,
        )))
    }

    /// Fetches the manifest text, `None` if it does not exist
    async fn fetch_manifest_text(&self) -> StorageResult<Option<String>> {
        let url = self.download_base().await?.join(&[&self.settings.manifest_name]);
        log::debug!("Reading manifest from {}", url);

        let response = self
            .http
            .inner()
            .get(&url)
            .header("Cache-Control", "no-store")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(response).await?.text().await?))
    }

    /// Reads the manifest; a missing manifest is an empty one
    pub async fn read_galleries(&self) -> StorageResult<Manifest> {
        match self.fetch_manifest_text().await? {
            Some(text) => Ok(Manifest::from_json(&text)?),
            None => {
                log::info!("No {} yet, starting empty", self.settings.manifest_name);
                Ok(Manifest::default())
            }
        }
    }

    /// Replaces the manifest object
    pub async fn write_galleries(&self, manifest: &Manifest) -> StorageResult<()> {
        let json = manifest.to_json_pretty()?;
        let object = UploadObject::new(self.settings.manifest_name.clone(), json.into_bytes())
            .with_content_type("application/json");
        self.upload_file(object).await?;
        log::info!("Manifest saved ({} galleries)", manifest.len());
        Ok(())
    }

    /// Authorizes, obtains an upload URL and checks the manifest.
    ///
    /// Authorization or upload URL failures are errors; a missing manifest
    /// is reported rather than failing.
    pub async fn test_connection(&self) -> StorageResult<ConnectionReport> {
        self.authorize_account().await?;
        self.get_upload_url().await?;

        let session = self.session().await?;
        let download_base = self.download_base().await?;
        let manifest_galleries = match self.fetch_manifest_text().await? {
            Some(text) => Some(Manifest::from_json(&text)?.len()),
            None => None,
        };

        Ok(ConnectionReport {
            api_url: session.api_url,
            download_url: session.download_url,
            download_base: download_base.base().to_string(),
            manifest_galleries,
        })
    }
}

#[async_trait]
impl ObjectStore for B2Client {
    async fn authorize(&self) -> StorageResult<()> {
        self.authorize_account().await
    }

    async fn upload(&self, object: UploadObject) -> StorageResult<StoredFile> {
        self.upload_file(object).await
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        self.delete_file(name).await
    }

    async fn read_manifest(&self) -> StorageResult<Manifest> {
        self.read_galleries().await
    }

    async fn write_manifest(&self, manifest: &Manifest) -> StorageResult<()> {
        self.write_galleries(manifest).await
    }
}

/// Turns a non-success response into [`StorageError::Api`]
async fn check(response: Response) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

fn api_error(status: u16, body: &str) -> StorageError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => StorageError::Api {
            status,
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => StorageError::Api {
            status,
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

/// Lowercase hex SHA-1 of the payload
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Percent-encodes an object name for the `X-Bz-File-Name` header
pub fn encode_file_name(name: &str) -> String {
    utf8_percent_encode(name, FILE_NAME_SAFE).to_string()
}

fn derive_download_base(download_url: &str, bucket_name: &str) -> String {
    format!("{}/file/{}/", download_url.trim_end_matches('/'), bucket_name)
}
