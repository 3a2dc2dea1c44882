//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{DownloadPolicy, SortMode};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Platform credentials and endpoints
    #[serde(default)]
    pub reddit: RedditConfig,

    /// Default download request
    #[serde(default)]
    pub download: DownloadConfig,

    /// Selector override file
    #[serde(default)]
    pub selectors: SelectorsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.chunk_size == 0 {
            return Err(AppError::validation("http.chunk_size must be > 0"));
        }
        if self.reddit.page_size == 0 || self.reddit.page_size > 100 {
            return Err(AppError::validation("reddit.page_size must be in 1..=100"));
        }
        if self.download.limit == 0 {
            return Err(AppError::validation("download.limit must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for image and page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Write size when streaming an image to disk
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
            chunk_size: defaults::chunk_size(),
        }
    }
}

/// Reddit application credentials and API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// User-Agent sent to the API (Reddit rejects generic agents)
    #[serde(default = "defaults::reddit_user_agent")]
    pub user_agent: String,

    /// Base URL for listing requests
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Base URL for the token endpoint
    #[serde(default = "defaults::auth_base")]
    pub auth_base: String,

    /// Posts requested per listing page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl RedditConfig {
    /// Credentials with default endpoints.
    pub fn with_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: defaults::reddit_user_agent(),
            api_base: defaults::api_base(),
            auth_base: defaults::auth_base(),
            page_size: defaults::page_size(),
        }
    }
}

/// Defaults for a download request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory
    #[serde(default = "defaults::download_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub sort: SortMode,

    /// Maximum posts per subreddit
    #[serde(default = "defaults::limit")]
    pub limit: usize,

    #[serde(default = "defaults::enabled")]
    pub albums: bool,

    #[serde(default = "defaults::enabled")]
    pub gifs: bool,

    #[serde(default)]
    pub nsfw: bool,
}

impl DownloadConfig {
    pub fn policy(&self) -> DownloadPolicy {
        DownloadPolicy {
            albums: self.albums,
            gifs: self.gifs,
            nsfw: self.nsfw,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            path: defaults::download_path(),
            sort: SortMode::default(),
            limit: defaults::limit(),
            albums: true,
            gifs: true,
            nsfw: false,
        }
    }
}

/// Location of the selector override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorsConfig {
    #[serde(default = "defaults::selectors_path")]
    pub path: PathBuf,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            path: defaults::selectors_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; imgbot/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn chunk_size() -> usize {
        512
    }

    // Reddit defaults
    pub fn reddit_user_agent() -> String {
        concat!("rust:imgbot:v", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn api_base() -> String {
        "https://oauth.reddit.com".into()
    }
    pub fn auth_base() -> String {
        "https://www.reddit.com".into()
    }
    pub fn page_size() -> usize {
        100
    }

    // Download defaults
    pub fn download_path() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn limit() -> usize {
        10
    }
    pub fn enabled() -> bool {
        true
    }

    pub fn selectors_path() -> PathBuf {
        PathBuf::from("selectors.json")
    }
}
