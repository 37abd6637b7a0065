//! Client configuration

use crate::ClientResult;
use crate::http::NetworkHttpClient;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration for connecting to the POS REST API
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | POS_API_BASE_URL | http://localhost:8000/api | API base path |
/// | POS_API_TOKEN | - | Bearer token |
/// | POS_REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | POS_STORAGE_DIR | ./pos-data | Client storage directory |
/// | POS_MENU_POLL_SECS | 60 | Menu version poll interval |
/// | POS_LOG_LEVEL | info | Log level |
/// | POS_LOG_JSON | false | JSON console logs |
/// | POS_LOG_DIR | - | Rolling log file directory |
///
/// A `.env` file in the working directory is loaded first.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://pos.example.com/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the client storage file
    pub storage_dir: PathBuf,

    /// Menu version poll interval in seconds
    pub menu_poll_secs: u64,

    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            storage_dir: PathBuf::from("./pos-data"),
            menu_poll_secs: 60,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            std::env::var("POS_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000/api".into()),
        );
        config.token = std::env::var("POS_API_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("POS_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.timeout);
        if let Ok(dir) = std::env::var("POS_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        config.menu_poll_secs = std::env::var("POS_MENU_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.menu_poll_secs);
        if let Ok(level) = std::env::var("POS_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_json = std::env::var("POS_LOG_JSON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config.log_dir = std::env::var("POS_LOG_DIR").ok();
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_menu_poll_secs(mut self, seconds: u64) -> Self {
        self.menu_poll_secs = seconds;
        self
    }

    /// Path of the JSON storage file
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir.join("client-storage.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Poll interval, never below one second
    pub fn menu_poll_interval(&self) -> Duration {
        Duration::from_secs(self.menu_poll_secs.max(1))
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        let client = NetworkHttpClient::new(&self.base_url, self.request_timeout())?;
        Ok(match &self.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api")
    }
}
