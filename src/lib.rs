// src/lib.rs

//! imgbot: subreddit image downloader library.
//!
//! Resolves post links to direct images or album archives using per-domain
//! selector rules, then writes them to a destination directory.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
