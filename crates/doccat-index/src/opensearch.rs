use async_trait::async_trait;
use doccat_types::{Document, SearchHit, SearchQuery};
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::error::{IndexError, IndexResult};
use crate::query::{build_search_query, filename_term, index_mapping};
use crate::traits::SearchIndex;

/// OpenSearch-backed catalog index using the REST API via `reqwest`.
///
/// Also speaks to Elasticsearch 7.10+, which shares every endpoint used
/// here. All documents go into the single index named by
/// [`SearchConfig::index_name`]. Writes pass `refresh=true` so that a search
/// issued right after an upload or delete observes it.
pub struct OpenSearchIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

/// Identity of the engine, as reported by its root endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: String,
    pub distribution: String,
}

impl OpenSearchIndex {
    /// Build a client from configuration. Does not contact the engine.
    pub fn new(config: &SearchConfig) -> IndexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IndexError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_owned(),
            index: config.index_name.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Build a [`reqwest::RequestBuilder`] for the given method and path,
    /// applying basic authentication when credentials are configured.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        let mut req = self.client.request(method, &url);
        if let Some(ref user) = self.username {
            req = req.basic_auth(user, self.password.as_deref());
        }
        req
    }

    async fn send(
        &self,
        operation: &'static str,
        req: reqwest::RequestBuilder,
    ) -> IndexResult<reqwest::Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| IndexError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(status_error(operation, resp).await)
        }
    }

    /// Fetch the engine's name and version from `GET /`.
    pub async fn ping(&self) -> IndexResult<ClusterInfo> {
        let resp = self
            .send("ping", self.request(reqwest::Method::GET, ""))
            .await?;
        let root: RootResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        Ok(ClusterInfo {
            cluster_name: root.cluster_name,
            version: root.version.number,
            distribution: root
                .version
                .distribution
                .unwrap_or_else(|| "elasticsearch".into()),
        })
    }
}

async fn status_error(operation: &'static str, resp: reqwest::Response) -> IndexError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    IndexError::Status {
        operation,
        status,
        body,
    }
}

// ---------------------------------------------------------------------------
// Engine response types (internal)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RootResponse {
    cluster_name: String,
    version: RootVersion,
}

#[derive(Deserialize)]
struct RootVersion {
    number: String,
    #[serde(default)]
    distribution: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    #[serde(default)]
    total: Option<HitsTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct HitsTotal {
    value: u64,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_source")]
    source: SearchHit,
}

#[derive(Deserialize)]
struct DeleteByQueryResponse {
    deleted: u64,
}

// ---------------------------------------------------------------------------
// SearchIndex implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl SearchIndex for OpenSearchIndex {
    async fn ensure_index(&self) -> IndexResult<()> {
        let resp = self
            .request(reqwest::Method::HEAD, &self.index)
            .send()
            .await
            .map_err(|e| IndexError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            tracing::debug!(index = %self.index, "search index exists");
            return Ok(());
        }
        if resp.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(status_error("index exists check", resp).await);
        }

        let resp = self
            .request(reqwest::Method::PUT, &self.index)
            .json(&index_mapping())
            .send()
            .await
            .map_err(|e| IndexError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            tracing::info!(index = %self.index, "search index created");
            return Ok(());
        }

        // Another instance may have created it between HEAD and PUT.
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        if body.contains("resource_already_exists_exception") {
            tracing::debug!(index = %self.index, "search index created concurrently");
            Ok(())
        } else {
            Err(IndexError::Status {
                operation: "create index",
                status,
                body,
            })
        }
    }

    async fn index_document(&self, document: &Document) -> IndexResult<()> {
        let path = format!("{}/_doc?refresh=true", self.index);
        self.send(
            "index document",
            self.request(reqwest::Method::POST, &path).json(document),
        )
        .await?;
        tracing::debug!(filename = %document.filename, "document indexed");
        Ok(())
    }

    async fn exists(&self, filename: &str) -> IndexResult<bool> {
        let path = format!("{}/_search", self.index);
        let body = json!({
            "query": filename_term(filename),
            "size": 0,
            "track_total_hits": true
        });

        let resp = self
            .send(
                "exists check",
                self.request(reqwest::Method::POST, &path).json(&body),
            )
            .await?;
        let search: SearchResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        Ok(search.hits.total.is_some_and(|t| t.value > 0))
    }

    async fn search(&self, query: &SearchQuery, limit: usize) -> IndexResult<Vec<SearchHit>> {
        let path = format!("{}/_search", self.index);
        let body = json!({
            "query": build_search_query(query),
            "_source": ["filename"],
            "size": limit
        });

        let resp = self
            .send("search", self.request(reqwest::Method::POST, &path).json(&body))
            .await?;
        let search: SearchResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        Ok(search.hits.hits.into_iter().map(|h| h.source).collect())
    }

    async fn delete_by_filename(&self, filename: &str) -> IndexResult<u64> {
        let path = format!("{}/_delete_by_query?refresh=true", self.index);
        let body = json!({ "query": filename_term(filename) });

        let resp = self
            .send(
                "delete by query",
                self.request(reqwest::Method::POST, &path).json(&body),
            )
            .await?;
        let result: DeleteByQueryResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        tracing::debug!(filename, deleted = result.deleted, "documents deleted by query");
        Ok(result.deleted)
    }
}

impl std::fmt::Debug for OpenSearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchIndex")
            .field("base_url", &self.base_url)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
