//! Persistence of downloaded resources.
//!
//! Images are streamed to `{root}/{final path segment}`; albums are zip
//! archives whose entries are extracted into `{root}`. Files with the same
//! name are overwritten.

pub mod local;

pub use local::LocalStorage;
