// src/models/policy.rs

//! Per-run content policy flags.

/// Which kinds of posts are eligible for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadPolicy {
    /// Download albums as zip archives
    pub albums: bool,
    /// Download `.gif` / `.gifv` resources
    pub gifs: bool,
    /// Download posts marked as adult content
    pub nsfw: bool,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            albums: true,
            gifs: true,
            nsfw: false,
        }
    }
}
