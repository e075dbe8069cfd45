use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the external search engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the engine, e.g. `http://localhost:9200`.
    pub url: String,
    /// Name of the single index holding catalog documents.
    pub index_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// Upper bound on hits returned by one search.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".into(),
            index_name: "documents".into(),
            username: None,
            password: None,
            timeout_secs: 30,
            max_results: 100,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.url, "http://localhost:9200");
        assert_eq!(c.index_name, "documents");
        assert_eq!(c.timeout(), Duration::from_secs(30));
        assert_eq!(c.max_results, 100);
        assert!(c.username.is_none());
    }

    #[test]
    fn base_url_trims_slash() {
        let c = SearchConfig {
            url: "http://search:9200/".into(),
            ..Default::default()
        };
        assert_eq!(c.base_url(), "http://search:9200");
    }

    #[test]
    fn partial_deserialize_fills_defaults() {
        let c: SearchConfig = serde_json::from_str(r#"{"index_name":"catalog"}"#).unwrap();
        assert_eq!(c.index_name, "catalog");
        assert_eq!(c.url, "http://localhost:9200");
    }
}
