// src/pipeline/download.rs

//! Download entry point.
//!
//! One subreddit is processed in place. Several subreddits are validated
//! first, then each valid one runs as its own task with its own HTTP client,
//! platform client and router.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::task::JoinSet;

use crate::error::{AppError, Result};
use crate::models::{Config, DownloadConfig, DownloadPolicy, RedditConfig, SortMode};
use crate::pipeline::{DownloadRouter, RouteSummary};
use crate::services::{PostSource, RedditClient, SelectorTable};
use crate::utils::http;

/// Parameters of a download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub subreddits: Vec<String>,
    pub sort: SortMode,
    pub limit: usize,
    pub albums: bool,
    pub gifs: bool,
    pub nsfw: bool,
    /// Overrides the bot's destination directory
    pub path: Option<PathBuf>,
}

impl DownloadRequest {
    /// Request with default options: hot, 10 posts, albums and gifs on,
    /// NSFW off.
    pub fn new<I, S>(subreddits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(subreddits, &DownloadConfig::default())
    }

    /// Request whose options come from the `[download]` config section.
    /// The configured path is not applied; it belongs to the bot.
    pub fn from_config<I, S>(subreddits: I, config: &DownloadConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subreddits: subreddits.into_iter().map(Into::into).collect(),
            sort: config.sort,
            limit: config.limit,
            albums: config.albums,
            gifs: config.gifs,
            nsfw: config.nsfw,
            path: None,
        }
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn albums(mut self, albums: bool) -> Self {
        self.albums = albums;
        self
    }

    pub fn gifs(mut self, gifs: bool) -> Self {
        self.gifs = gifs;
        self
    }

    pub fn nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn policy(&self) -> DownloadPolicy {
        DownloadPolicy {
            albums: self.albums,
            gifs: self.gifs,
            nsfw: self.nsfw,
        }
    }
}

/// Downloads images from subreddits.
///
/// ```no_run
/// # async fn run() {
/// use imgbot::models::RedditConfig;
/// use imgbot::pipeline::{DownloadRequest, ImgBot};
///
/// let bot = ImgBot::new("./pics", RedditConfig::with_credentials("id", "secret", "imgbot"));
/// bot.download(&DownloadRequest::new(["pics"]).gifs(false)).await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImgBot {
    path: PathBuf,
    config: Arc<Config>,
    selectors: Arc<SelectorTable>,
}

impl ImgBot {
    /// Create a bot downloading to `path` with the given credentials.
    ///
    /// Selector overrides are read from the default `selectors.json`.
    pub fn new(path: impl Into<PathBuf>, credentials: RedditConfig) -> Self {
        let config = Config {
            reddit: credentials,
            ..Config::default()
        };
        let selectors = SelectorTable::load_or_default(&config.selectors.path);
        Self {
            path: path.into(),
            config: Arc::new(config),
            selectors: Arc::new(selectors),
        }
    }

    /// Create a bot from a full configuration.
    pub fn with_config(config: Config) -> Self {
        let selectors = SelectorTable::load_or_default(&config.selectors.path);
        log::debug!("Using {} domain selector rule(s)", selectors.len());
        Self {
            path: config.download.path.clone(),
            config: Arc::new(config),
            selectors: Arc::new(selectors),
        }
    }

    /// Replace the selector table.
    pub fn with_selectors(mut self, selectors: SelectorTable) -> Self {
        self.selectors = Arc::new(selectors);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download from every subreddit in the request.
    ///
    /// Failures are logged; a failing post or subreddit never stops the
    /// others. Returns the totals over all subreddits.
    pub async fn download(&self, request: &DownloadRequest) -> RouteSummary {
        let destination = request.path.clone().unwrap_or_else(|| self.path.clone());

        match request.subreddits.as_slice() {
            [] => {
                log::warn!("[-] No subreddit given.");
                RouteSummary::default()
            }
            [subreddit] => {
                run_worker(
                    Arc::clone(&self.config),
                    Arc::clone(&self.selectors),
                    subreddit.clone(),
                    request.clone(),
                    destination,
                )
                .await
            }
            subreddits => self.download_many(subreddits, request, destination).await,
        }
    }

    async fn download_many(
        &self,
        subreddits: &[String],
        request: &DownloadRequest,
        destination: PathBuf,
    ) -> RouteSummary {
        let valid = match self.valid_subreddits(subreddits).await {
            Ok(valid) => valid,
            Err(e) => {
                log::error!("[-] Could not validate subreddits: {}", e);
                return RouteSummary::default();
            }
        };

        let mut workers = JoinSet::new();
        for subreddit in valid {
            workers.spawn(run_worker(
                Arc::clone(&self.config),
                Arc::clone(&self.selectors),
                subreddit,
                request.clone(),
                destination.clone(),
            ));
        }

        let mut total = RouteSummary::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(summary) => total += summary,
                Err(e) => log::error!("[-] Download worker failed: {}", e),
            }
        }
        total
    }

    /// Drop subreddits that fail the existence check.
    async fn valid_subreddits(&self, subreddits: &[String]) -> Result<Vec<String>> {
        let client = RedditClient::connect(&self.config.http, &self.config.reddit).await?;
        let checks = join_all(subreddits.iter().map(|s| client.validate(s))).await;

        Ok(subreddits
            .iter()
            .zip(checks)
            .filter_map(|(subreddit, check)| match check {
                Ok(()) => Some(subreddit.clone()),
                Err(AppError::InvalidSubreddit(_)) => {
                    log::warn!("[-] Subreddit {} does not exist.", subreddit);
                    None
                }
                Err(e) => {
                    log::warn!("[-] Could not check subreddit {}: {}", subreddit, e);
                    None
                }
            })
            .collect())
    }
}

/// One subreddit worker: own clients, own router, sequential posts.
async fn run_worker(
    config: Arc<Config>,
    selectors: Arc<SelectorTable>,
    subreddit: String,
    request: DownloadRequest,
    destination: PathBuf,
) -> RouteSummary {
    let result: Result<RouteSummary> = async {
        let source = RedditClient::connect(&config.http, &config.reddit).await?;
        let client = http::create_async_client(&config.http)?;
        let router = DownloadRouter::new(client, selectors, config.http.chunk_size);
        download_subreddit(&source, &router, &subreddit, &request, &destination).await
    }
    .await;

    result.unwrap_or_else(|e| {
        log::error!("[-] Failed to download from {}: {}", subreddit, e);
        RouteSummary::default()
    })
}

/// Fetch a listing and route its posts.
pub async fn download_subreddit(
    source: &dyn PostSource,
    router: &DownloadRouter,
    subreddit: &str,
    request: &DownloadRequest,
    destination: &Path,
) -> Result<RouteSummary> {
    let start = Instant::now();
    log::debug!(
        "Fetching {} {} posts from r/{}",
        request.limit,
        request.sort,
        subreddit
    );

    let posts = source.posts(subreddit, request.sort, request.limit).await?;
    let summary = router
        .process(&posts, &request.policy(), destination)
        .await;

    log::info!(
        "[+] Finished downloading from {} in {:.2} seconds",
        subreddit,
        start.elapsed().as_secs_f64()
    );
    Ok(summary)
}
