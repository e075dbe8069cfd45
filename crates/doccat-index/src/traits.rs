use async_trait::async_trait;
use doccat_types::{Document, SearchHit, SearchQuery};

use crate::error::IndexResult;

/// Storage and query interface for catalog documents.
///
/// Implementations must be `Send + Sync` to be shared across request
/// handlers. None of the operations are transactional with respect to each
/// other: `exists` followed by `index_document` is a check-then-act race when
/// two callers use the same filename concurrently.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the index and its mapping if it does not exist yet.
    async fn ensure_index(&self) -> IndexResult<()>;

    /// Add a document. Never replaces an existing one.
    async fn index_document(&self, document: &Document) -> IndexResult<()>;

    /// Whether at least one document has exactly this filename.
    async fn exists(&self, filename: &str) -> IndexResult<bool>;

    /// Run a filtered search, returning at most `limit` hits.
    async fn search(&self, query: &SearchQuery, limit: usize) -> IndexResult<Vec<SearchHit>>;

    /// Remove every document with exactly this filename. Returns how many
    /// were deleted.
    async fn delete_by_filename(&self, filename: &str) -> IndexResult<u64>;
}
