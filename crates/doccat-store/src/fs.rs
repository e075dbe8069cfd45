//! Directory-backed blob store.
//!
//! Each blob is a regular file directly under the root directory, named
//! exactly as its [`FileName`]. Uploads are first streamed into a hidden
//! `.<uuid>.upload` file in the same directory and then renamed over the
//! target, so readers never observe a half-written blob. Hidden files are
//! never listed; [`FileName`] rejects leading dots so they cannot collide
//! with real blobs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use doccat_types::FileName;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::traits::{BlobReader, BlobStore, ByteStream};

/// Blob store rooted at a local directory.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "blob store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.upload", Uuid::now_v7()))
    }

    async fn write_temp(&self, temp: &Path, mut data: ByteStream<'_>) -> StoreResult<u64> {
        let mut file = fs::File::create(temp).await?;
        let mut written = 0u64;
        while let Some(chunk) = data.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

/// Metadata for `path` if it names a regular file.
async fn regular_file(path: &Path) -> StoreResult<Option<std::fs::Metadata>> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(meta)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put<'a>(&self, name: &FileName, data: ByteStream<'a>) -> StoreResult<u64> {
        let temp = self.temp_path();
        let written = match self.write_temp(&temp, data).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&temp).await {
                    tracing::warn!(path = %temp.display(), error = %cleanup, "failed to remove partial upload");
                }
                return Err(e);
            }
        };
        fs::rename(&temp, self.blob_path(name)).await?;
        tracing::debug!(name = %name, bytes = written, "blob written");
        Ok(written)
    }

    async fn open(&self, name: &FileName) -> StoreResult<Option<BlobReader>> {
        let path = self.blob_path(name);
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            // Some platforms refuse to open directories at all.
            Err(e) => match regular_file(&path).await? {
                None => return Ok(None),
                Some(_) => return Err(e.into()),
            },
        };
        // Size the handle, not the path: a concurrent put may rename a new
        // blob over the path after it was opened.
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Ok(None);
        }
        Ok(Some(BlobReader {
            size: meta.len(),
            stream: ReaderStream::new(file).boxed(),
        }))
    }

    async fn exists(&self, name: &FileName) -> StoreResult<bool> {
        Ok(regular_file(&self.blob_path(name)).await?.is_some())
    }

    async fn delete(&self, name: &FileName) -> StoreResult<bool> {
        let path = self.blob_path(name);
        if regular_file(&path).await?.is_none() {
            return Ok(false);
        }
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(name = %name, "blob deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if FileName::parse(name.as_str()).is_ok() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn location(&self, name: &FileName) -> String {
        self.blob_path(name).display().to_string()
    }
}
