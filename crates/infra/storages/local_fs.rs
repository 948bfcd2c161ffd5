use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::storage::{MediaReader, MediaStorage},
    value_objects::media::{FALLBACK_EXT, PHOTOS_FOLDER},
};

pub const DEFAULT_BASE_DIR: &str = "data";

const CHUNK_SIZE: usize = 32 * 1024;

/// Media files on the local disk under `base_dir/<folder>/<uuid><ext>`.
#[derive(Debug, Clone)]
pub struct LocalFsStorage {
    base_dir: PathBuf,
}

impl LocalFsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let base_dir = if base_dir.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_BASE_DIR)
        } else {
            base_dir
        };

        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Removes the temp file unless disarmed. Covers early returns and a dropped
/// save future alike.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "local_fs: failed to remove temp file");
            }
        }
    }
}

pub fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return FALLBACK_EXT.to_string();
    }

    let ext = if ext.starts_with('.') { ext } else { format!(".{ext}") };
    if ext == ".jpeg" {
        return ".jpg".to_string();
    }
    ext
}

fn has_traversal(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\') || path.contains("..")
}

/// Lexically cleans a relative path. `None` when it climbs out of its root.
fn clean_relative(path: &str) -> Option<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::ParentDir => {
                if !cleaned.pop() {
                    return None;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(cleaned)
}

async fn copy_with_cancel(
    reader: &mut MediaReader,
    file: &mut fs::File,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;

    loop {
        if cancel.is_cancelled() {
            bail!("save cancelled");
        }

        let n = reader.read(&mut buf).await.context("read upload")?;
        if n == 0 {
            break;
        }

        file.write_all(&buf[..n]).await.context("write temp file")?;
        written += n as u64;
    }

    Ok(written)
}

#[async_trait]
impl MediaStorage for LocalFsStorage {
    async fn save(&self, reader: MediaReader, ext: String, cancel: CancellationToken) -> Result<String> {
        self.save_to(PHOTOS_FOLDER.to_string(), reader, ext, cancel).await
    }

    async fn save_to(
        &self,
        folder: String,
        mut reader: MediaReader,
        ext: String,
        cancel: CancellationToken,
    ) -> Result<String> {
        let folder = folder.trim().trim_matches('/');
        let folder = if folder.is_empty() { PHOTOS_FOLDER } else { folder };
        if has_traversal(folder) {
            bail!("invalid storage folder: {folder}");
        }

        let dir = self.base_dir.join(folder);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create storage dir {}", dir.display()))?;

        let file_name = format!("{}{}", Uuid::new_v4(), normalize_ext(&ext));
        let final_path = dir.join(&file_name);
        let tmp_path = dir.join(format!("{file_name}.tmp"));

        let mut guard = TempFileGuard::new(tmp_path.clone());

        let mut file = fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("create temp file {}", tmp_path.display()))?;

        let written = copy_with_cancel(&mut reader, &mut file, &cancel).await?;

        file.flush().await.context("flush temp file")?;
        file.sync_all().await.context("sync temp file")?;
        drop(file);

        fs::rename(&tmp_path, &final_path)
            .await
            .with_context(|| format!("rename temp file to {}", final_path.display()))?;
        guard.disarm();

        let relative_path = format!("{folder}/{file_name}");
        debug!(%relative_path, bytes = written, "local_fs: file saved");

        Ok(relative_path)
    }

    async fn remove(&self, relative_path: String) -> Result<()> {
        let relative_path = relative_path.trim();
        if relative_path.is_empty() {
            return Ok(());
        }
        if has_traversal(relative_path) {
            return Err(anyhow!("invalid storage path: {relative_path}"));
        }

        let path = self.base_dir.join(relative_path);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("remove stored file {}", path.display()))
            }
        }
    }

    fn resolve_path(&self, relative_path: &str) -> Option<PathBuf> {
        let trimmed = relative_path.trim();
        if trimmed.is_empty() {
            return None;
        }

        let path = Path::new(trimmed);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }

        let cleaned = clean_relative(trimmed.trim_start_matches('/'))?;
        if cleaned.as_os_str().is_empty() {
            return None;
        }

        Some(self.base_dir.join(cleaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::domain::value_objects::media::VIDEOS_FOLDER;

    fn reader(bytes: &[u8]) -> MediaReader {
        Box::new(Cursor::new(bytes.to_vec()))
    }

    fn files_in(dir: &Path) -> Vec<String> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn normalize_ext_variants() {
        assert_eq!(normalize_ext(""), ".bin");
        assert_eq!(normalize_ext("  JPEG "), ".jpg");
        assert_eq!(normalize_ext(".png"), ".png");
        assert_eq!(normalize_ext("mp4"), ".mp4");
        assert_eq!(normalize_ext("../x"), ".bin");
    }

    #[tokio::test]
    async fn save_then_read_returns_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
        let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();

        let relative = storage
            .save(reader(&payload), ".jpeg".to_string(), CancellationToken::new())
            .await
            .unwrap();

        assert!(relative.starts_with("photos/"));
        assert!(relative.ends_with(".jpg"));

        let absolute = storage.resolve_path(&relative).unwrap();
        assert_eq!(std::fs::read(absolute).unwrap(), payload);
        assert!(files_in(&dir.path().join("photos")).iter().all(|name| !name.ends_with(".tmp")));
    }

    #[tokio::test]
    async fn save_to_videos_folder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());

        let relative = storage
            .save_to(
                VIDEOS_FOLDER.to_string(),
                reader(b"video"),
                "mp4".to_string(),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(relative.starts_with("videos/"));
        assert!(relative.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn cancelled_save_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = storage
            .save(reader(b"abc"), ".png".to_string(), cancel)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("save cancelled"));
        assert!(files_in(&dir.path().join("photos")).is_empty());
    }

    #[tokio::test]
    async fn remove_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());

        for path in [
            "../etc/passwd",
            "/etc/passwd",
            "photos/../../x",
            "photos/..",
            "photos/a..jpg",
        ] {
            assert!(storage.remove(path.to_string()).await.is_err(), "path {path:?}");
        }
    }

    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
        let relative = storage
            .save(reader(b"x"), ".png".to_string(), CancellationToken::new())
            .await
            .unwrap();

        storage.remove(relative.clone()).await.unwrap();
        assert!(!dir.path().join(&relative).exists());

        storage.remove(relative).await.unwrap();
    }

    #[test]
    fn resolve_path_cleans_and_guards_root() {
        let storage = LocalFsStorage::new("/srv/media");

        assert_eq!(storage.resolve_path("  "), None);
        assert_eq!(
            storage.resolve_path("/photos/a.jpg"),
            Some(PathBuf::from("/photos/a.jpg"))
        );
        assert_eq!(
            storage.resolve_path("photos/./x/../a.jpg"),
            Some(PathBuf::from("/srv/media/photos/a.jpg"))
        );
        assert_eq!(storage.resolve_path("../secret"), None);
        assert_eq!(storage.resolve_path("photos/../.."), None);
    }

    #[test]
    fn empty_base_dir_uses_default() {
        assert_eq!(LocalFsStorage::new("").base_dir(), Path::new(DEFAULT_BASE_DIR));
    }
}
