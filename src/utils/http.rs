// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
///
/// Each worker builds its own client so connections are reused within a
/// subreddit run and never shared across runs.
pub fn create_async_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()?;
    Ok(client)
}

/// GET a URL and require a success status.
///
/// Network failures and non-success statuses both map to
/// [`AppError::UnreachableResource`].
pub async fn get_ok(client: &Client, url: &str) -> Result<Response> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::unreachable(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::unreachable(url, format!("HTTP {status}")));
    }
    Ok(response)
}
