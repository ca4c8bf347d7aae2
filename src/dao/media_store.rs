use std::{path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::{
    dao::storage::{StorageError, StorageResult},
    state::{ids::epoch_millis, media::MediaKind},
};

/// URL prefix under which the assets directory is served.
pub const ASSETS_MOUNT: &str = "/assets";

/// File known to the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// File name (original name for uploads, stored name for listings).
    pub name: String,
    /// URL the file is served from.
    pub url: String,
}

/// Upload being written to its final location chunk by chunk.
///
/// Nothing is buffered beyond the chunk handed to [`PendingUpload::write`]. Call
/// [`PendingUpload::finish`] once the body is complete, or [`PendingUpload::discard`] to
/// remove the partial file.
pub struct PendingUpload {
    file: fs::File,
    path: PathBuf,
    stored: StoredMedia,
    bytes: u64,
}

impl PendingUpload {
    /// Append `chunk` to the file.
    pub async fn write(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|source| StorageError::io("write", &self.path, source))?;
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    /// Flush the file and hand back where it can be fetched from.
    pub async fn finish(mut self) -> StorageResult<StoredMedia> {
        self.file
            .flush()
            .await
            .map_err(|source| StorageError::io("flush", &self.path, source))?;
        info!(
            path = %self.path.display(),
            bytes = self.bytes,
            "stored uploaded media"
        );
        Ok(self.stored)
    }

    /// Drop the partially written file.
    pub async fn discard(self) {
        let Self { file, path, .. } = self;
        drop(file);
        if let Err(err) = fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %err, "could not remove partial upload");
        }
    }
}

/// Abstraction over where uploaded media lives.
pub trait MediaStore: Send + Sync {
    /// Open a timestamp-prefixed file under `kind`'s folder for a new upload.
    fn begin(
        &self,
        kind: MediaKind,
        original_name: String,
    ) -> BoxFuture<'static, StorageResult<PendingUpload>>;
    /// Every file currently stored for `kind`; empty when the folder cannot be read.
    fn list(&self, kind: MediaKind) -> BoxFuture<'static, Vec<StoredMedia>>;
    /// Check the backing storage is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Media store writing into per-category folders below a root directory.
#[derive(Clone)]
pub struct DiskMediaStore {
    inner: Arc<DiskInner>,
}

struct DiskInner {
    root: PathBuf,
    mount: String,
}

impl DiskMediaStore {
    /// Store rooted at `root`, publishing URLs under `mount`.
    pub fn new(root: impl Into<PathBuf>, mount: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(DiskInner {
                root: root.into(),
                mount: mount.into().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Create the root and every category folder.
    pub async fn ensure_layout(&self) -> StorageResult<()> {
        for kind in MediaKind::ALL {
            let dir = self.folder(kind);
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| StorageError::io("create directory", &dir, source))?;
        }
        info!(root = %self.inner.root.display(), "media folders ready");
        Ok(())
    }

    fn folder(&self, kind: MediaKind) -> PathBuf {
        self.inner.root.join(kind.folder())
    }

    fn public_url(&self, kind: MediaKind, file_name: &str) -> String {
        format!("{}/{}/{}", self.inner.mount, kind.folder(), file_name)
    }

    async fn create(&self, kind: MediaKind, original_name: String) -> StorageResult<PendingUpload> {
        let base = base_name(&original_name)
            .ok_or_else(|| StorageError::InvalidName(original_name.clone()))?;
        let dir = self.folder(kind);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::io("create directory", &dir, source))?;

        let file_name = format!("{}-{}", epoch_millis(), base);
        let path = dir.join(&file_name);
        let file = fs::File::create(&path)
            .await
            .map_err(|source| StorageError::io("create", &path, source))?;

        debug!(kind = kind.folder(), file = %file_name, "receiving upload");
        Ok(PendingUpload {
            file,
            path,
            stored: StoredMedia {
                name: base.to_string(),
                url: self.public_url(kind, &file_name),
            },
            bytes: 0,
        })
    }

    async fn files(&self, kind: MediaKind) -> Vec<StoredMedia> {
        let dir = self.folder(kind);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "media folder unreadable; listing nothing");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let is_file = entry
                        .file_type()
                        .await
                        .map(|file_type| file_type.is_file())
                        .unwrap_or(false);
                    if let (true, Ok(name)) = (is_file, entry.file_name().into_string()) {
                        names.push(name);
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(dir = %dir.display(), error = %err, "stopped listing media folder");
                    break;
                }
            }
        }

        names.sort();
        names
            .into_iter()
            .map(|name| StoredMedia {
                url: self.public_url(kind, &name),
                name,
            })
            .collect()
    }

    async fn check_root(&self) -> StorageResult<()> {
        let root = &self.inner.root;
        let metadata = fs::metadata(root)
            .await
            .map_err(|source| StorageError::io("inspect", root, source))?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::io(
                "inspect",
                root,
                std::io::Error::other("assets root is not a directory"),
            ))
        }
    }
}

impl MediaStore for DiskMediaStore {
    fn begin(
        &self,
        kind: MediaKind,
        original_name: String,
    ) -> BoxFuture<'static, StorageResult<PendingUpload>> {
        let store = self.clone();
        Box::pin(async move { store.create(kind, original_name).await })
    }

    fn list(&self, kind: MediaKind) -> BoxFuture<'static, Vec<StoredMedia>> {
        let store = self.clone();
        Box::pin(async move { store.files(kind).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check_root().await })
    }
}

/// Final path component of an uploaded file name, ignoring any client-side directories.
fn base_name(original: &str) -> Option<&str> {
    original
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("song.mp3"), Some("song.mp3"));
        assert_eq!(base_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(base_name("C:\\Users\\me\\clip.mp4"), Some("clip.mp4"));
        assert_eq!(base_name("dir/"), None);
        assert_eq!(base_name(".."), None);
        assert_eq!(base_name(""), None);
    }

    #[tokio::test]
    async fn upload_writes_timestamped_file_into_category_folder() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskMediaStore::new(dir.path(), ASSETS_MOUNT);

        let mut upload = store
            .begin(MediaKind::Image, "cat.png".into())
            .await
            .unwrap();
        upload.write(b"p").await.unwrap();
        upload.write(b"ng").await.unwrap();
        let stored = upload.finish().await.unwrap();

        assert_eq!(stored.name, "cat.png");
        let file_name = stored
            .url
            .strip_prefix("/assets/images/")
            .expect("url under images mount");
        let (stamp, rest) = file_name.split_once('-').unwrap();
        assert!(stamp.parse::<u64>().is_ok());
        assert_eq!(rest, "cat.png");

        let written = std::fs::read(dir.path().join("images").join(file_name)).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn list_returns_sorted_files_with_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskMediaStore::new(dir.path(), "/assets/");
        store.ensure_layout().await.unwrap();
        std::fs::write(dir.path().join("music").join("2-b.mp3"), b"b").unwrap();
        std::fs::write(dir.path().join("music").join("1-a.mp3"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("music").join("nested")).unwrap();

        let files = store.list(MediaKind::Music).await;
        assert_eq!(
            files,
            vec![
                StoredMedia {
                    name: "1-a.mp3".into(),
                    url: "/assets/music/1-a.mp3".into()
                },
                StoredMedia {
                    name: "2-b.mp3".into(),
                    url: "/assets/music/2-b.mp3".into()
                },
            ]
        );
        assert!(store.list(MediaKind::Video).await.is_empty());
    }

    #[tokio::test]
    async fn missing_folder_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskMediaStore::new(dir.path().join("absent"), ASSETS_MOUNT);
        assert!(store.list(MediaKind::Image).await.is_empty());
        assert!(store.health_check().await.is_err());
    }

    #[tokio::test]
    async fn discarded_upload_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskMediaStore::new(dir.path(), ASSETS_MOUNT);

        let mut upload = store
            .begin(MediaKind::Video, "clip.mp4".into())
            .await
            .unwrap();
        upload.write(b"partial").await.unwrap();
        upload.discard().await;

        assert!(store.list(MediaKind::Video).await.is_empty());
    }

    #[tokio::test]
    async fn begin_rejects_nameless_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskMediaStore::new(dir.path(), ASSETS_MOUNT);
        let err = match store.begin(MediaKind::Video, "uploads/".into()).await {
            Ok(_) => panic!("nameless upload accepted"),
            Err(err) => err,
        };
        assert!(matches!(err, StorageError::InvalidName(_)));
    }
}
