//! Foundation types for doccat.
//!
//! Every other doccat crate depends on `doccat-types`. The types here are the
//! shared vocabulary between the blob store, the search index, and the HTTP
//! catalog service.
//!
//! # Key Types
//!
//! - [`FileName`] -- A validated, storage-safe file name
//! - [`Document`] -- Metadata record held in the search index, one per upload
//! - [`SearchQuery`] -- Optional filters for a metadata search
//! - [`UploadedFile`] -- Per-file status reported back to uploaders

pub mod document;
pub mod error;
pub mod name;
pub mod query;

pub use document::{Document, SearchHit, UploadStatus, UploadedFile};
pub use error::{TypesError, TypesResult};
pub use name::{FileName, MAX_FILE_NAME_LEN};
pub use query::SearchQuery;
