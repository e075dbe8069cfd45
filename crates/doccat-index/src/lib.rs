//! Search index for doccat.
//!
//! Holds one [`Document`] per uploaded file and answers metadata searches.
//! Query execution, tokenization, and index consistency all live in the
//! external engine; this crate only shapes requests and parses responses.
//!
//! # Backends
//!
//! All backends implement the [`SearchIndex`] trait:
//!
//! - [`OpenSearchIndex`] -- OpenSearch / Elasticsearch over its REST API
//! - [`InMemorySearchIndex`] -- `Vec`-backed index with the same matching rules
//!
//! # Matching Rules
//!
//! - Free text is a case-insensitive substring match against any of
//!   `filename`, `content_type`, and `path`.
//! - A date range is inclusive on `upload_date`.
//! - A content type is matched exactly.
//! - Filters are combined conjunctively; no filter matches everything.
//!
//! [`Document`]: doccat_types::Document

pub mod config;
pub mod error;
pub mod memory;
pub mod opensearch;
pub mod query;
pub mod traits;

pub use config::SearchConfig;
pub use error::{IndexError, IndexResult};
pub use memory::InMemorySearchIndex;
pub use opensearch::{ClusterInfo, OpenSearchIndex};
pub use query::{build_search_query, escape_wildcard, index_mapping, TEXT_FIELDS};
pub use traits::SearchIndex;
