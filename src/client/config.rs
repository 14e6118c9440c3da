//! Client configuration.
//!
//! [`ClientConfig`] is built by whoever assembles the application and handed
//! to [`HttpTaskApi`](crate::client::http::HttpTaskApi) at construction.
//! There is no process-wide client.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for talking to the task backend.
///
/// # Example Configuration File
///
/// ```toml
/// base_url = "https://tasks.example.com/api/"
/// timeout_ms = 15000
/// credentials_path = "/data/taskdesk/credentials.toml"
///
/// [headers]
/// "X-Client" = "taskdesk-android"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every operation path is joined onto.
    pub base_url: Url,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where the file-backed credential store lives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,

    /// Extra headers sent with every request.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    concat!("taskdesk/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    ///
    /// A trailing slash is added if missing so relative operation paths join
    /// under it rather than replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base(Url::parse(base_url)?),
            timeout_ms: default_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
            credentials_path: None,
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.base_url = normalize_base(config.base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// - `TASKDESK_BASE_URL` (required)
    /// - `TASKDESK_TIMEOUT_MS`
    /// - `TASKDESK_CREDENTIALS_PATH`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TASKDESK_BASE_URL")
            .map_err(|_| Error::Config("TASKDESK_BASE_URL is not set".to_string()))?;
        let mut config = Self::new(&base_url)?;

        if let Ok(timeout) = std::env::var("TASKDESK_TIMEOUT_MS") {
            config.timeout_ms = timeout
                .parse()
                .map_err(|_| Error::Config(format!("invalid TASKDESK_TIMEOUT_MS: {}", timeout)))?;
        }
        if let Ok(path) = std::env::var("TASKDESK_CREDENTIALS_PATH") {
            config.credentials_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the credential file location.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve an operation path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than zero".to_string()));
        }
        match self.base_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::Config(format!(
                "base_url must be http or https, got {}",
                other
            ))),
        }
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
