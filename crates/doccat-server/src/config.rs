use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use doccat_index::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// What to do when an uploaded filename already has a document in the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Index a new document for every upload.
    Always,
    /// Skip indexing when a document with the same filename exists.
    #[default]
    SkipExisting,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::SkipExisting => write!(f, "skip-existing"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ServerError;

    fn from_str(s: &str) -> ServerResult<Self> {
        match s {
            "always" => Ok(Self::Always),
            "skip-existing" => Ok(Self::SkipExisting),
            other => Err(ServerError::Config(format!(
                "unknown duplicate policy {other:?} (expected \"always\" or \"skip-existing\")"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding uploaded blobs.
    pub storage_root: PathBuf,
    /// Request body limit for uploads, in bytes.
    pub max_upload_size: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            storage_root: PathBuf::from("uploads"),
            max_upload_size: 100 * 1024 * 1024,
            duplicate_policy: DuplicatePolicy::default(),
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }
}
