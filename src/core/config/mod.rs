//! # Config Module
//!
//! Client configuration: where the backend lives and how patiently to
//! talk to it.

use crate::error::ReviewClientError;
use std::time::Duration;
use url::Url;

/// Default backend address of the desktop app
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8686";

/// Default similarity threshold (pHash Hamming distance, lower = stricter)
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Interval between status requests while polling
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, always ending in `/`
    base_url: Url,
    /// Interval between status requests in polling mode
    pub poll_interval: Duration,
    /// Timeout for individual HTTP requests
    pub request_timeout: Duration,
    /// Threshold sent with a scan when none is given
    pub default_threshold: u32,
    /// Whether plain JPEG/PNG/HEIC files are scanned alongside RAW files
    pub include_images: bool,
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Root of the REST API (`{base}/api/`)
    pub fn api_url(&self) -> Result<Url, ReviewClientError> {
        self.base_url
            .join("api/")
            .map_err(|e| ReviewClientError::Config(format!("invalid API url: {e}")))
    }

    /// WebSocket endpoint of the progress stream
    pub fn progress_ws_url(&self) -> Result<Url, ReviewClientError> {
        let mut url = self
            .api_url()?
            .join("ws/progress")
            .map_err(|e| ReviewClientError::Config(format!("invalid progress url: {e}")))?;

        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ReviewClientError::Config(format!("cannot derive websocket url from {url}")))?;
        Ok(url)
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    poll_interval: Duration,
    request_timeout: Duration,
    default_threshold: u32,
    include_images: bool,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
            default_threshold: DEFAULT_THRESHOLD,
            include_images: false,
        }
    }

    /// Set the server address (`http://host:port`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn default_threshold(mut self, threshold: u32) -> Self {
        self.default_threshold = threshold;
        self
    }

    pub fn include_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<ClientConfig, ReviewClientError> {
        let mut base_url = Url::parse(self.base_url.trim())
            .map_err(|e| ReviewClientError::Config(format!("invalid server url '{}': {e}", self.base_url)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ReviewClientError::Config(format!(
                "server url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if self.poll_interval.is_zero() {
            return Err(ReviewClientError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        Ok(ClientConfig {
            base_url,
            poll_interval: self.poll_interval,
            request_timeout: self.request_timeout,
            default_threshold: self.default_threshold,
            include_images: self.include_images,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
