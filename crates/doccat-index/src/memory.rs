use async_trait::async_trait;
use doccat_types::{Document, SearchHit, SearchQuery};
use tokio::sync::RwLock;

use crate::error::IndexResult;
use crate::traits::SearchIndex;

/// In-memory search index for tests and embedding.
///
/// Documents are kept in insertion order and matched with the same rules the
/// OpenSearch backend sends to the engine.
#[derive(Debug, Default)]
pub struct InMemorySearchIndex {
    docs: RwLock<Vec<Document>>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored document.
    pub async fn documents(&self) -> Vec<Document> {
        self.docs.read().await.clone()
    }

    /// Number of documents with exactly this filename.
    pub async fn count(&self, filename: &str) -> usize {
        self.docs
            .read()
            .await
            .iter()
            .filter(|d| d.filename == filename)
            .count()
    }
}

fn matches(query: &SearchQuery, doc: &Document) -> bool {
    if let Some(text) = &query.text {
        let needle = text.to_lowercase();
        let fields = [
            Some(doc.filename.as_str()),
            doc.content_type.as_deref(),
            Some(doc.path.as_str()),
        ];
        let hit = fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    if let Some((start, end)) = &query.date_range {
        if doc.upload_date < *start || doc.upload_date > *end {
            return false;
        }
    }

    if let Some(content_type) = &query.content_type {
        if doc.content_type.as_deref() != Some(content_type.as_str()) {
            return false;
        }
    }

    true
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn ensure_index(&self) -> IndexResult<()> {
        Ok(())
    }

    async fn index_document(&self, document: &Document) -> IndexResult<()> {
        self.docs.write().await.push(document.clone());
        Ok(())
    }

    async fn exists(&self, filename: &str) -> IndexResult<bool> {
        Ok(self.docs.read().await.iter().any(|d| d.filename == filename))
    }

    async fn search(&self, query: &SearchQuery, limit: usize) -> IndexResult<Vec<SearchHit>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|d| matches(query, d))
            .take(limit)
            .cloned()
            .map(SearchHit::from)
            .collect())
    }

    async fn delete_by_filename(&self, filename: &str) -> IndexResult<u64> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.filename != filename);
        Ok((before - docs.len()) as u64)
    }
}
