//! Blob storage for doccat.
//!
//! Uploaded file contents live in a blob store keyed by [`FileName`]. The
//! store never interprets the bytes and knows nothing about the search
//! index; keeping the two in step is the catalog service's job.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`FsBlobStore`] -- one regular file per blob under a root directory
//! - [`InMemoryBlobStore`] -- map-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Writes are last-writer-wins. There is no locking between writers.
//! 2. A failed write never leaves a truncated blob under the target name.
//! 3. All I/O errors are propagated, never silently ignored.
//!
//! [`FileName`]: doccat_types::FileName

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::{BlobReader, BlobStore, ByteStream};
