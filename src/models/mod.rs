// src/models/mod.rs

//! Domain models for the downloader.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod policy;
mod post;
mod resource;
mod selectors;
mod sort;

// Re-export all public types
pub use config::{Config, DownloadConfig, HttpConfig, RedditConfig, SelectorsConfig};
pub use policy::DownloadPolicy;
pub use post::Post;
pub use resource::{ResolvedResource, ResourceKind};
pub use selectors::SelectorRule;
pub use sort::{SortMode, TimeFilter};
