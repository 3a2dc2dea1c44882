// src/pipeline/route.rs

//! Per-post download routing: filter → resolve → filter → fetch → persist.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{DownloadPolicy, Post};
use crate::services::{PostFilter, ResourceResolver, SelectorTable, SkipReason};
use crate::storage::LocalStorage;
use crate::utils::http;
use crate::utils::url::normalize;

/// What happened to a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Image written to the given path
    Saved(PathBuf),
    /// Album archive extracted, with its entry count
    Extracted(usize),
    Skipped(SkipReason),
}

/// Counters for one pass over a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AddAssign for RouteSummary {
    fn add_assign(&mut self, other: Self) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Routes posts to the image writer or the album extractor.
#[derive(Debug, Clone)]
pub struct DownloadRouter {
    client: Client,
    resolver: ResourceResolver,
    chunk_size: usize,
}

impl DownloadRouter {
    /// Create a router sharing `client` between page scraping and downloads.
    pub fn new(client: Client, selectors: Arc<SelectorTable>, chunk_size: usize) -> Self {
        let resolver = ResourceResolver::new(client.clone(), selectors);
        Self {
            client,
            resolver,
            chunk_size,
        }
    }

    /// Process posts in order. Every failure is logged and confined to its
    /// post; nothing is retried.
    pub async fn process(
        &self,
        posts: &[Post],
        policy: &DownloadPolicy,
        destination: &Path,
    ) -> RouteSummary {
        let storage = LocalStorage::new(destination, self.chunk_size);
        let mut summary = RouteSummary::default();

        for post in posts {
            match self.route_post(post, policy, &storage).await {
                Ok(PostOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(outcome) => {
                    summary.downloaded += 1;
                    if let PostOutcome::Extracted(entries) = outcome {
                        log::debug!("Extracted {} album entries", entries);
                    }
                    log::info!("[+] Downloaded {}", post.title);
                }
                Err(error) => {
                    summary.failed += 1;
                    Self::log_failure(post, &error);
                }
            }
        }

        summary
    }

    /// Run a single post through the pipeline.
    pub async fn route_post(
        &self,
        post: &Post,
        policy: &DownloadPolicy,
        storage: &LocalStorage,
    ) -> Result<PostOutcome> {
        if let Some(reason) = PostFilter::should_skip(post, policy) {
            return Ok(PostOutcome::Skipped(reason));
        }

        let resolved = self.resolver.resolve(&post.url).await?;

        if let Some(reason) = PostFilter::should_skip_resolved(post, &resolved, policy) {
            return Ok(PostOutcome::Skipped(reason));
        }

        let url = normalize(&resolved.url);
        let response = http::get_ok(&self.client, &url).await?;

        if resolved.is_album() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| AppError::unreachable(&url, e))?;
            let entries = storage.extract_album(bytes.to_vec()).await?;
            Ok(PostOutcome::Extracted(entries))
        } else {
            let path = storage.save_image(response).await?;
            Ok(PostOutcome::Saved(path))
        }
    }

    fn log_failure(post: &Post, error: &AppError) {
        match error {
            AppError::UnreachableResource { url, reason } => {
                log::warn!("[-] Encountered bad url: {} ({})", url, reason);
            }
            AppError::ExtractionFailed { url, reason } => {
                log::warn!("[-] Could not extract link from {} ({})", url, reason);
            }
            AppError::MalformedArchive(reason) => {
                log::warn!("[-] Could not extract album {}: {}", post.title, reason);
            }
            other => {
                log::warn!("[-] Failed to download {}: {}", post.title, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router() -> DownloadRouter {
        DownloadRouter::new(Client::new(), Arc::new(SelectorTable::builtin()), 4)
    }

    #[test]
    fn test_summary_add_assign() {
        let mut total = RouteSummary {
            downloaded: 1,
            skipped: 2,
            failed: 0,
        };
        total += RouteSummary {
            downloaded: 3,
            skipped: 0,
            failed: 1,
        };
        assert_eq!(
            total,
            RouteSummary {
                downloaded: 4,
                skipped: 2,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_saves_image_in_chunks() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..=255u8).cycle().take(1500).collect();
        Mock::given(method("GET"))
            .and(path("/img/cat.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), 4);
        let post = Post::link("Cat", format!("{}/img/cat.png", server.uri()));

        let outcome = router()
            .route_post(&post, &DownloadPolicy::default(), &storage)
            .await
            .unwrap();

        let saved = dir.path().join("cat.png");
        assert_eq!(outcome, PostOutcome::Saved(saved.clone()));
        assert_eq!(std::fs::read(saved).unwrap(), body);
    }

    #[tokio::test]
    async fn test_skipped_post_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), 4);
        let post = Post {
            stickied: true,
            ..Post::link("Rules", format!("{}/x.png", server.uri()))
        };

        let outcome = router()
            .route_post(&post, &DownloadPolicy::default(), &storage)
            .await
            .unwrap();
        assert_eq!(outcome, PostOutcome::Skipped(SkipReason::Stickied));
    }

    #[tokio::test]
    async fn test_gif_resolved_then_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let policy = DownloadPolicy {
            gifs: false,
            ..DownloadPolicy::default()
        };
        let posts = vec![Post::link("Loop", format!("{}/loop.gifv", server.uri()))];

        let summary = router().process(&posts, &policy, dir.path()).await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_continues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpg".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let posts = vec![
            Post::link("Broken", format!("{}/missing.jpg", server.uri())),
            Post::link("Fine", format!("{}/ok.jpg", server.uri())),
        ];

        let summary = router()
            .process(&posts, &DownloadPolicy::default(), dir.path())
            .await;
        assert_eq!(
            summary,
            RouteSummary {
                downloaded: 1,
                skipped: 0,
                failed: 1
            }
        );
        assert!(dir.path().join("ok.jpg").is_file());
    }

    #[tokio::test]
    async fn test_malformed_album_is_per_post_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/XYZ/zip"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let posts = vec![Post::link("Album", format!("{}/a/XYZ", server.uri()))];

        let summary = router()
            .process(&posts, &DownloadPolicy::default(), dir.path())
            .await;
        assert_eq!(summary.failed, 1);
    }
}
