// crates/storage/src/client.rs
//! Shared HTTP client configuration

use crate::error::StorageResult;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("Galleria/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin wrapper around a configured `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a client with default configuration
    pub fn new() -> StorageResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> StorageResult<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { inner, config })
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
