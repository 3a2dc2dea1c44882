//! Pipeline entry points for download operations.
//!
//! - `DownloadRouter`: filter, resolve, fetch and persist a listing's posts
//! - `ImgBot`: fan a download request out over one or more subreddits

pub mod download;
pub mod route;

pub use download::{DownloadRequest, ImgBot, download_subreddit};
pub use route::{DownloadRouter, PostOutcome, RouteSummary};
