// src/models/resource.rs

//! Resolved download target.

use std::fmt;

/// How a resolved URL must be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A single file written under its final path segment
    SingleImage,
    /// A zip archive extracted into the destination
    AlbumArchive,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::SingleImage => f.write_str("image"),
            ResourceKind::AlbumArchive => f.write_str("album"),
        }
    }
}

/// Direct, fetchable resource behind a post link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub url: String,
    pub kind: ResourceKind,
}

impl ResolvedResource {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ResourceKind::SingleImage,
        }
    }

    pub fn album(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ResourceKind::AlbumArchive,
        }
    }

    pub fn is_album(&self) -> bool {
        self.kind == ResourceKind::AlbumArchive
    }
}
