//! Configuration for the Solr client.
//!
//! # Example
//!
//! ```
//! use solr_kit::SolrConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SolrConfig {
//!     url: "http://localhost:8983/solr".into(),
//!     collection: "mycore".into(),
//!     ..Default::default()
//! };
//! assert_eq!(config.commit_within_ms, 1000);
//! ```

use serde::Deserialize;

use crate::error::SolrError;
use crate::retry::RetryConfig;

/// Configuration for a Solr connection.
///
/// `url` is required; `collection` can be empty when talking to a
/// single-core Solr instance.
#[derive(Debug, Clone, Deserialize)]
pub struct SolrConfig {
    /// Base url for Solr (e.g., "http://localhost:8983/solr")
    #[serde(default)]
    pub url: String,

    /// Collection or core name
    #[serde(default)]
    pub collection: String,

    /// Soft-commit window in ms applied to update requests
    #[serde(default = "default_commit_within_ms")]
    pub commit_within_ms: u64,

    /// Config set used when creating the core (core admin / testkit)
    #[serde(default = "default_config_set")]
    pub config_set: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Collection name to use for tests; derived from `collection` when unset
    #[serde(default)]
    pub test_collection: Option<String>,

    /// Retry behavior for transient transport failures
    #[serde(default = "RetryConfig::query", skip_deserializing)]
    pub retry: RetryConfig,
}

fn default_commit_within_ms() -> u64 {
    1000
}
fn default_config_set() -> String {
    "_default".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            collection: String::new(),
            commit_within_ms: default_commit_within_ms(),
            config_set: default_config_set(),
            timeout_ms: default_timeout_ms(),
            test_collection: None,
            retry: RetryConfig::query(),
        }
    }
}

impl SolrConfig {
    /// Validate that required settings are present.
    pub fn validate(&self) -> Result<(), SolrError> {
        if self.url.is_empty() {
            return Err(SolrError::Config(
                "Solr connection requires a base URL".to_string(),
            ));
        }
        Ok(())
    }

    /// Collection name to use in tests: the explicit `test_collection` if
    /// configured, otherwise the regular collection with a `test_` prefix.
    pub fn test_collection(&self) -> String {
        self.test_collection
            .clone()
            .unwrap_or_else(|| format!("test_{}", self.collection))
    }
}
