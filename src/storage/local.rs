//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── abc123.jpg        # Single image, named after the URL's last segment
//! ├── album-01.png      # Album entries, extracted as stored in the archive
//! └── album-02.png
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::Response;
use tokio::io::AsyncWriteExt;
use zip::ZipArchive;

use crate::error::{AppError, Result};
use crate::utils::url::file_name;

/// Local filesystem download sink.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    chunk_size: usize,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            root_dir: root_dir.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Ensure the root directory exists.
    async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        Ok(())
    }

    /// Target path for an image URL.
    pub fn image_path(&self, url: &str) -> Result<PathBuf> {
        let name = file_name(url)
            .ok_or_else(|| AppError::download(url, "URL has no file name segment"))?;
        Ok(self.root_dir.join(name))
    }

    /// Stream a response body to disk in fixed-size chunks.
    ///
    /// The file is named after the final URL of the response, so redirects
    /// determine the name.
    pub async fn save_image(&self, mut response: Response) -> Result<PathBuf> {
        let path = self.image_path(response.url().as_str())?;
        self.ensure_root().await?;

        let mut file = tokio::fs::File::create(&path).await?;
        while let Some(bytes) = response.chunk().await? {
            for piece in bytes.chunks(self.chunk_size) {
                file.write_all(piece).await?;
            }
        }
        file.flush().await?;

        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Extract every entry of a zip archive into the root directory.
    ///
    /// Returns the number of archive entries.
    pub async fn extract_album(&self, bytes: Vec<u8>) -> Result<usize> {
        self.ensure_root().await?;
        let root = self.root_dir.clone();

        tokio::task::spawn_blocking(move || Self::extract_archive(bytes, &root))
            .await
            .map_err(|e| AppError::MalformedArchive(format!("extraction task failed: {e}")))?
    }

    fn extract_archive(bytes: Vec<u8>, root: &Path) -> Result<usize> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let entries = archive.len();
        archive.extract(root)?;
        Ok(entries)
    }
}
