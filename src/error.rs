// src/error.rs

//! Unified error handling for the downloader.

use std::fmt;

use thiserror::Error;

/// Result type alias for downloader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Target could not be fetched (network error or non-success status)
    #[error("Unreachable resource {url}: {reason}")]
    UnreachableResource { url: String, reason: String },

    /// Page was fetched but no matching element or attribute was found
    #[error("Could not extract link from {url}: {reason}")]
    ExtractionFailed { url: String, reason: String },

    /// Subreddit existence check failed
    #[error("Subreddit {0} does not exist")]
    InvalidSubreddit(String),

    /// Album body could not be opened or extracted as a zip archive
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// Platform authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisting a download failed
    #[error("Download error for {context}: {message}")]
    Download { context: String, message: String },
}

impl AppError {
    /// Create an unreachable-resource error.
    pub fn unreachable(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::UnreachableResource {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an extraction error.
    pub fn extraction(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::ExtractionFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a download error with context.
    pub fn download(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Download {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::MalformedArchive(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_message() {
        let err = AppError::unreachable("http://example.com/x", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "Unreachable resource http://example.com/x: HTTP 404"
        );
    }

    #[test]
    fn test_zip_error_maps_to_malformed_archive() {
        let err: AppError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, AppError::MalformedArchive(_)));
    }
}
