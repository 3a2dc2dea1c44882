// src/models/post.rs

//! Subreddit post snapshot.

use serde::{Deserialize, Serialize};

/// A single submission in a subreddit listing.
///
/// Deserializes directly from the `data` object of a Reddit listing child.
/// Fields the downloader does not need are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Platform identifier (e.g. "1abcde")
    #[serde(default)]
    pub id: String,

    /// Post title
    #[serde(default)]
    pub title: String,

    /// Link target of the post
    #[serde(default)]
    pub url: String,

    /// Subreddit the post belongs to
    #[serde(default)]
    pub subreddit: String,

    /// Relative link to the comments page
    #[serde(default)]
    pub permalink: String,

    /// Pinned by moderators
    #[serde(default)]
    pub stickied: bool,

    /// Text post without an external link
    #[serde(default)]
    pub is_self: bool,

    /// Marked as adult content
    #[serde(default)]
    pub over_18: bool,
}

impl Post {
    /// Create a link post with the given title and target.
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing_data() {
        let json = r#"{
            "id": "abc123",
            "title": "Sunset",
            "url": "https://i.imgur.com/sunset.jpg",
            "subreddit": "pics",
            "permalink": "/r/pics/comments/abc123/sunset/",
            "stickied": false,
            "is_self": false,
            "over_18": true,
            "score": 1234
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.title, "Sunset");
        assert_eq!(post.url, "https://i.imgur.com/sunset.jpg");
        assert!(post.over_18);
        assert!(!post.stickied);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let post: Post = serde_json::from_str(r#"{"title": "t", "url": "u"}"#).unwrap();
        assert!(!post.stickied && !post.is_self && !post.over_18);
    }
}
