//! Post eligibility rules.
//!
//! Rules run in order and the first match wins. Stickied/self posts and the
//! adult-content policy are checked before resolution; the album and gif
//! policies need the resolved resource and run afterwards.

use std::fmt;

use crate::models::{DownloadPolicy, Post, ResolvedResource};
use crate::utils::url::has_gif_extension;

/// Why a post was not downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Stickied,
    SelfPost,
    Nsfw,
    Album,
    Gif,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::Stickied => "stickied post",
            SkipReason::SelfPost => "self post",
            SkipReason::Nsfw => "NSFW post",
            SkipReason::Album => "album",
            SkipReason::Gif => "gif",
        };
        f.write_str(label)
    }
}

/// Stateless post filter.
pub struct PostFilter;

impl PostFilter {
    /// Pre-resolution rules: stickied, self post, adult content.
    pub fn should_skip(post: &Post, policy: &DownloadPolicy) -> Option<SkipReason> {
        let reason = if post.stickied {
            SkipReason::Stickied
        } else if post.is_self {
            SkipReason::SelfPost
        } else if post.over_18 && !policy.nsfw {
            SkipReason::Nsfw
        } else {
            return None;
        };

        log::info!("[-] Ignoring {}: {}", reason, post.title);
        Some(reason)
    }

    /// Post-resolution rules: album and gif policies.
    pub fn should_skip_resolved(
        post: &Post,
        resolved: &ResolvedResource,
        policy: &DownloadPolicy,
    ) -> Option<SkipReason> {
        let reason = if resolved.is_album() && !policy.albums {
            SkipReason::Album
        } else if has_gif_extension(&resolved.url) && !policy.gifs {
            SkipReason::Gif
        } else {
            return None;
        };

        log::info!("[-] Ignoring {}: {} ({})", reason, post.title, resolved.url);
        Some(reason)
    }
}
