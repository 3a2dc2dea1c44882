//! Resource resolver.
//!
//! Turns an arbitrary post link into a direct, fetchable resource: direct
//! image links and album links are classified without touching the network,
//! everything else is fetched and scraped with the domain's selector rule.

use std::sync::Arc;

use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ResolvedResource, SelectorRule};
use crate::services::SelectorTable;
use crate::utils::http;
use crate::utils::url::{self as url_utils, album_archive, has_image_extension, is_album, normalize};

/// Resolves post links to direct resources.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    client: Client,
    selectors: Arc<SelectorTable>,
}

impl ResourceResolver {
    pub fn new(client: Client, selectors: Arc<SelectorTable>) -> Self {
        Self { client, selectors }
    }

    /// Resolve a post link.
    ///
    /// Fails with [`AppError::UnreachableResource`] when the page cannot be
    /// fetched and [`AppError::ExtractionFailed`] when it holds no link.
    pub async fn resolve(&self, url: &str) -> Result<ResolvedResource> {
        let url = normalize(url);
        if let Some(resolved) = Self::classify(&url) {
            return Ok(resolved);
        }

        let link = self.extract_from_page(&url).await?;
        Ok(ResolvedResource::image(link))
    }

    /// Classify a normalized URL without fetching it.
    ///
    /// Returns `None` when the page has to be scraped.
    pub fn classify(url: &str) -> Option<ResolvedResource> {
        if has_image_extension(url) {
            Some(ResolvedResource::image(url))
        } else if is_album(url) {
            Some(ResolvedResource::album(album_archive(url)))
        } else {
            None
        }
    }

    async fn extract_from_page(&self, url: &str) -> Result<String> {
        let response = http::get_ok(&self.client, url).await?;
        let text = response
            .text()
            .await
            .map_err(|e| AppError::unreachable(url, e))?;

        let domain = url_utils::get_domain(url).unwrap_or_default();
        let rule = self.selectors.rule_for(&domain);
        log::debug!("Scraping {} with <{}> rule for '{}'", url, rule.name, domain);

        Self::extract_link(&text, rule, url)
    }

    /// Find the first element matching `rule` and read its link attribute.
    ///
    /// Relative links are resolved against `page_url`.
    pub fn extract_link(html: &str, rule: &SelectorRule, page_url: &str) -> Result<String> {
        let link_attr = rule.link_attr().ok_or_else(|| {
            AppError::extraction(
                page_url,
                format!("selector rule for <{}> has no link attribute", rule.name),
            )
        })?;

        let selector = Self::parse_selector(&rule.name)?;
        let document = Html::parse_document(html);

        let element = document
            .select(&selector)
            .find(|element| rule.matches(element.value()))
            .ok_or_else(|| {
                AppError::extraction(page_url, format!("no <{}> element matches", rule.name))
            })?;

        let raw = element
            .value()
            .attr(link_attr)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::extraction(
                    page_url,
                    format!("<{}> has no '{}' attribute", rule.name, link_attr),
                )
            })?;

        Ok(match Url::parse(page_url) {
            Ok(base) => url_utils::resolve(&base, raw),
            Err(_) => raw.to_string(),
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver() -> ResourceResolver {
        ResourceResolver::new(Client::new(), Arc::new(SelectorTable::builtin()))
    }

    fn page(head: &str) -> String {
        format!("<html><head>{head}</head><body><p>post</p></body></html>")
    }

    #[tokio::test]
    async fn test_direct_image_needs_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for ext in ["png", "GIF", "gifv", "Jpg", "JPEG"] {
            let url = format!("{}/pic.{}", server.uri(), ext);
            let resolved = resolver().resolve(&url).await.unwrap();
            assert_eq!(resolved.url, url);
            assert_eq!(resolved.kind, ResourceKind::SingleImage);
        }
    }

    #[tokio::test]
    async fn test_album_needs_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let url = format!("{}/a/XYZ", server.uri());
        let resolved = resolver().resolve(&url).await.unwrap();
        assert_eq!(resolved.url, format!("{url}/zip"));
        assert_eq!(resolved.kind, ResourceKind::AlbumArchive);
    }

    #[tokio::test]
    async fn test_missing_scheme_is_normalized() {
        let resolved = resolver().resolve("i.imgur.com/abc.jpg").await.unwrap();
        assert_eq!(resolved.url, "http://i.imgur.com/abc.jpg");
    }

    #[tokio::test]
    async fn test_default_rule_reads_og_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                r#"<meta property="og:title" content="t"><meta property="og:image" content="https://cdn.example.com/x.png">"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let resolved = resolver()
            .resolve(&format!("{}/post/1", server.uri()))
            .await
            .unwrap();
        assert_eq!(resolved, ResolvedResource::image("https://cdn.example.com/x.png"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = resolver()
            .resolve(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnreachableResource { .. }));
    }

    #[tokio::test]
    async fn test_page_without_match_fails_extraction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page("<title>x</title>")))
            .mount(&server)
            .await;

        let err = resolver()
            .resolve(&format!("{}/post/2", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed { .. }));
    }

    #[test]
    fn test_extract_link_domain_rule() {
        let rule = SelectorTable::builtin().rule_for("imgur.com").clone();
        let html = page(r#"<link rel="stylesheet" href="/s.css"><link rel="image_src" href="https://i.imgur.com/abc.jpg">"#);
        let link = ResourceResolver::extract_link(&html, &rule, "http://imgur.com/abc").unwrap();
        assert_eq!(link, "https://i.imgur.com/abc.jpg");
    }

    #[test]
    fn test_extract_link_resolves_relative() {
        let rule = SelectorTable::builtin().rule_for("tinypic.com").clone();
        let html = r#"<html><body><a class="thickbox" href="/images/1.png">view</a></body></html>"#;
        let link = ResourceResolver::extract_link(html, &rule, "http://tinypic.com/view.php?pic=1").unwrap();
        assert_eq!(link, "http://tinypic.com/images/1.png");
    }

    #[test]
    fn test_extract_link_missing_attribute() {
        let rule = SelectorTable::builtin().default_rule().clone();
        let html = page(r#"<meta property="og:image">"#);
        let err = ResourceResolver::extract_link(&html, &rule, "http://example.com").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed { .. }));
    }

    #[test]
    fn test_rule_without_link_fails_on_use() {
        let rule: SelectorRule = serde_json::from_str(r#"{"name": "meta", "property": "og:image"}"#).unwrap();
        let html = page(r#"<meta property="og:image" content="x.png">"#);
        let err = ResourceResolver::extract_link(&html, &rule, "http://example.com").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed { .. }));
    }
}
