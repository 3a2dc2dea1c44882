//! Service layer for the downloader.
//!
//! This module contains the business logic for:
//! - Per-domain extraction rules (`SelectorTable`)
//! - Resolving post links to direct resources (`ResourceResolver`)
//! - Skipping ineligible posts (`PostFilter`)
//! - Reading subreddit listings (`PostSource`, `RedditClient`)

mod filter;
pub mod reddit;
mod resolver;
mod selectors;

pub use filter::{PostFilter, SkipReason};
pub use reddit::{PostSource, RedditClient};
pub use resolver::ResourceResolver;
pub use selectors::{DEFAULT_KEY, SelectorTable};
