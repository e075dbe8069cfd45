use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use doccat_types::FileName;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::{StoreError, StoreResult};

/// A stream of byte chunks flowing into or out of a store.
pub type ByteStream<'a> = BoxStream<'a, std::io::Result<Bytes>>;

/// An opened blob: its length and a stream over its contents.
pub struct BlobReader {
    pub size: u64,
    pub stream: ByteStream<'static>,
}

impl std::fmt::Debug for BlobReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader").field("size", &self.size).finish()
    }
}

/// Name-keyed byte storage.
///
/// All implementations must satisfy these invariants:
/// - `put` replaces any existing blob of the same name (last writer wins).
/// - A `put` that fails part-way leaves the previous blob, if any, intact.
/// - `list` returns every stored name exactly once, sorted ascending.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stream `data` into the blob called `name` and return the number of
    /// bytes written.
    async fn put<'a>(&self, name: &FileName, data: ByteStream<'a>) -> StoreResult<u64>;

    /// Open a blob for reading.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    async fn open(&self, name: &FileName) -> StoreResult<Option<BlobReader>>;

    /// Check whether a blob exists.
    async fn exists(&self, name: &FileName) -> StoreResult<bool>;

    /// Delete a blob. Returns `true` if it existed.
    async fn delete(&self, name: &FileName) -> StoreResult<bool>;

    /// Names of all stored blobs, sorted.
    async fn list(&self) -> StoreResult<Vec<String>>;

    /// Backend-specific location string recorded alongside indexed metadata.
    fn location(&self, name: &FileName) -> String;

    /// Read a whole blob into memory.
    ///
    /// Default implementation drains the stream returned by `open()`.
    async fn read_bytes(&self, name: &FileName) -> StoreResult<Bytes> {
        let mut reader = self
            .open(name)
            .await?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let mut buf = BytesMut::with_capacity(reader.size as usize);
        while let Some(chunk) = reader.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}
