use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

pub type MediaReader = Box<dyn AsyncRead + Send + Unpin>;

/// Durable media storage addressed by relative paths such as
/// `photos/<uuid>.jpg`.
#[automock]
#[async_trait]
pub trait MediaStorage {
    /// Stores into the default photo folder.
    async fn save(&self, reader: MediaReader, ext: String, cancel: CancellationToken) -> Result<String>;
    async fn save_to(
        &self,
        folder: String,
        reader: MediaReader,
        ext: String,
        cancel: CancellationToken,
    ) -> Result<String>;
    /// Absent files count as removed. Paths escaping the root are rejected.
    async fn remove(&self, relative_path: String) -> Result<()>;
    /// Absolute location of a stored path, `None` if it cannot be resolved
    /// inside the storage root.
    fn resolve_path(&self, relative_path: &str) -> Option<PathBuf>;
}
