//! Subreddit listing client.
//!
//! Authenticates with the application-only OAuth grant and pages through
//! listings until the requested number of posts is collected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{HttpConfig, Post, RedditConfig, SortMode};

/// Source of subreddit posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Up to `limit` posts of `subreddit`, in listing order.
    async fn posts(&self, subreddit: &str, sort: SortMode, limit: usize) -> Result<Vec<Post>>;

    /// Fail with [`AppError::InvalidSubreddit`] if the subreddit does not exist.
    async fn validate(&self, subreddit: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<ListingChild<T>>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingChild<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Thing {
    #[serde(default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Reddit API client holding an application-only access token.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: Client,
    config: RedditConfig,
    access_token: String,
}

impl RedditClient {
    /// Build a client and obtain an access token.
    pub async fn connect(http: &HttpConfig, config: &RedditConfig) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            return Err(AppError::Auth("reddit client_id is not set".to_string()));
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(http.timeout_secs))
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .build()?;

        let access_token = Self::request_token(&client, config).await?;
        log::debug!("Authenticated against {}", config.auth_base);

        Ok(Self {
            client,
            config: config.clone(),
            access_token,
        })
    }

    async fn request_token(client: &Client, config: &RedditConfig) -> Result<String> {
        let url = format!(
            "{}/api/v1/access_token",
            config.auth_base.trim_end_matches('/')
        );
        let response = client
            .post(&url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Auth(format!("token endpoint returned HTTP {status}")));
        }

        let token: TokenResponse = response.json().await?;
        match (token.access_token, token.error) {
            (Some(access_token), None) if !access_token.is_empty() => Ok(access_token),
            (_, Some(error)) => Err(AppError::Auth(error)),
            _ => Err(AppError::Auth("no access token in response".to_string())),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(reqwest::StatusCode, Option<T>)> {
        let response = self
            .client
            .get(self.endpoint(path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok((status, None));
        }
        Ok((status, Some(response.json().await?)))
    }

    fn check_name(subreddit: &str) -> Result<()> {
        let valid = !subreddit.is_empty()
            && subreddit
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(AppError::InvalidSubreddit(subreddit.to_string()))
        }
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn posts(&self, subreddit: &str, sort: SortMode, limit: usize) -> Result<Vec<Post>> {
        Self::check_name(subreddit)?;
        let path = format!("/r/{}/{}", subreddit, sort.endpoint());
        let page_size = self.config.page_size.clamp(1, 100);

        let mut posts = Vec::with_capacity(limit);
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let mut query = vec![
                ("limit", (limit - posts.len()).min(page_size).to_string()),
                ("raw_json", "1".to_string()),
            ];
            if let Some(filter) = sort.time_filter() {
                query.push(("t", filter.as_str().to_string()));
            }
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let (status, listing) = self.get_json::<Listing<Post>>(&path, &query).await?;
            let listing = listing.ok_or_else(|| {
                AppError::unreachable(self.endpoint(&path), format!("HTTP {status}"))
            })?;

            let fetched = listing.data.children.len();
            posts.extend(listing.data.children.into_iter().map(|child| child.data));
            after = listing.data.after;

            log::debug!("Fetched {} posts from r/{} ({} total)", fetched, subreddit, posts.len());
            if fetched == 0 || after.is_none() {
                break;
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }

    async fn validate(&self, subreddit: &str) -> Result<()> {
        Self::check_name(subreddit)?;
        let path = format!("/r/{subreddit}/about");
        match self.get_json::<Thing>(&path, &[("raw_json", "1".to_string())]).await? {
            (_, Some(thing)) if thing.kind == "t5" => Ok(()),
            _ => Err(AppError::InvalidSubreddit(subreddit.to_string())),
        }
    }
}
