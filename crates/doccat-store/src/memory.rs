use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use doccat_types::FileName;
use futures::{stream, StreamExt};
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::{BlobReader, BlobStore, ByteStream};

/// In-memory, map-based blob store.
///
/// Intended for tests and embedding. Blobs are held as [`Bytes`] behind an
/// async `RwLock`; a write only becomes visible once its stream has been
/// fully drained, mirroring the rename-on-complete behaviour of
/// [`FsBlobStore`](crate::FsBlobStore).
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns `true` if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put<'a>(&self, name: &FileName, mut data: ByteStream<'a>) -> StoreResult<u64> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = data.next().await {
            buf.extend_from_slice(&chunk?);
        }
        let written = buf.len() as u64;
        self.blobs
            .write()
            .await
            .insert(name.as_str().to_string(), buf.freeze());
        Ok(written)
    }

    async fn open(&self, name: &FileName) -> StoreResult<Option<BlobReader>> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(name.as_str()).map(|data| BlobReader {
            size: data.len() as u64,
            stream: stream::once(futures::future::ready(Ok(data.clone()))).boxed(),
        }))
    }

    async fn exists(&self, name: &FileName) -> StoreResult<bool> {
        Ok(self.blobs.read().await.contains_key(name.as_str()))
    }

    async fn delete(&self, name: &FileName) -> StoreResult<bool> {
        Ok(self.blobs.write().await.remove(name.as_str()).is_some())
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }

    fn location(&self, name: &FileName) -> String {
        format!("memory://{name}")
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore").finish_non_exhaustive()
    }
}
