//! The catalog service: fans requests out to the blob store and the search
//! index.
//!
//! The two collaborators are never updated atomically. An upload writes the
//! blob before indexing it; a delete removes the blob before dropping its
//! documents, and an index failure at that point is logged rather than
//! reported because the blob is already gone.

use std::sync::Arc;

use doccat_index::SearchIndex;
use doccat_store::{BlobReader, BlobStore, ByteStream};
use doccat_types::{Document, FileName, SearchHit, SearchQuery, UploadedFile};

use crate::config::{DuplicatePolicy, ServerConfig};
use crate::error::{ServerError, ServerResult};

/// Stateless request-handling layer over a [`BlobStore`] and a [`SearchIndex`].
pub struct CatalogService {
    blobs: Arc<dyn BlobStore>,
    index: Arc<dyn SearchIndex>,
    duplicate_policy: DuplicatePolicy,
    max_results: usize,
}

impl CatalogService {
    pub fn new(blobs: Arc<dyn BlobStore>, index: Arc<dyn SearchIndex>) -> Self {
        let defaults = ServerConfig::default();
        Self {
            blobs,
            index,
            duplicate_policy: defaults.duplicate_policy,
            max_results: defaults.search.max_results,
        }
    }

    /// Build a service with the policy and limits from `config`.
    pub fn from_config(
        config: &ServerConfig,
        blobs: Arc<dyn BlobStore>,
        index: Arc<dyn SearchIndex>,
    ) -> Self {
        Self::new(blobs, index)
            .with_duplicate_policy(config.duplicate_policy)
            .with_max_results(config.search.max_results)
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Store one uploaded file and index its metadata.
    ///
    /// Under [`DuplicatePolicy::SkipExisting`] the existence check and the
    /// insert are separate calls, so concurrent uploads of one name may both
    /// index.
    pub async fn upload_file(
        &self,
        name: &FileName,
        content_type: Option<String>,
        data: ByteStream<'_>,
    ) -> ServerResult<UploadedFile> {
        let size = self.blobs.put(name, data).await?;
        let document = Document::new(name.as_str(), self.blobs.location(name), size, content_type);

        match self.duplicate_policy {
            DuplicatePolicy::Always => self.index.index_document(&document).await?,
            DuplicatePolicy::SkipExisting => {
                if self.already_indexed(name).await {
                    tracing::debug!(filename = %name, "document already indexed, skipping");
                } else {
                    self.index.index_document(&document).await?;
                }
            }
        }

        tracing::info!(filename = %name, size, "file uploaded");
        Ok(UploadedFile::success(name.as_str()))
    }

    /// A failed lookup counts as "not indexed".
    async fn already_indexed(&self, name: &FileName) -> bool {
        match self.index.exists(name.as_str()).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(filename = %name, error = %e, "existence check failed, indexing anyway");
                false
            }
        }
    }

    /// Names of every stored blob, read from the blob store rather than the
    /// index.
    pub async fn list_files(&self) -> ServerResult<Vec<String>> {
        Ok(self.blobs.list().await?)
    }

    pub async fn open_file(&self, name: &FileName) -> ServerResult<BlobReader> {
        self.blobs
            .open(name)
            .await?
            .ok_or_else(|| ServerError::NotFound(name.to_string()))
    }

    pub async fn search(&self, query: &SearchQuery) -> ServerResult<Vec<SearchHit>> {
        Ok(self.index.search(query, self.max_results).await?)
    }

    /// Remove a blob, then every document carrying its filename.
    pub async fn delete_file(&self, name: &FileName) -> ServerResult<()> {
        if !self.blobs.delete(name).await? {
            return Err(ServerError::NotFound(name.to_string()));
        }

        match self.index.delete_by_filename(name.as_str()).await {
            Ok(deleted) => {
                tracing::info!(filename = %name, documents = deleted, "file deleted");
            }
            Err(e) => {
                tracing::warn!(filename = %name, error = %e, "blob deleted but index cleanup failed");
            }
        }
        Ok(())
    }
}
