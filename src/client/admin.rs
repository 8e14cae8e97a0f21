//! API handler for Solr core administration.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{build_url, Requestor, CORE_ADMIN_HANDLER};
use crate::error::SolrError;
use crate::http::HttpRequest;

/// Status subset returned by [`CoreAdmin::status`].
#[derive(Debug, Clone)]
pub struct CoreStatus {
    /// Cores that failed to initialize, keyed by core name
    pub init_failures: Value,
    /// Per-core status details, keyed by core name
    pub status: Value,
}

/// API handler for the CoreAdmin endpoint.
pub struct CoreAdmin {
    requestor: Arc<Requestor>,
    solr_url: String,
    url: String,
}

impl CoreAdmin {
    pub(crate) fn new(requestor: Arc<Requestor>, solr_url: String) -> Self {
        let url = build_url(&solr_url, "", CORE_ADMIN_HANDLER);
        Self {
            requestor,
            solr_url,
            url,
        }
    }

    fn action(&self, params: Vec<(String, String)>) -> Result<Value, SolrError> {
        self.requestor
            .send("admin", HttpRequest::get(&self.url).with_query(params))
    }

    /// Create a new core and register it.
    pub fn create(&self, name: &str, config_set: Option<&str>) -> Result<(), SolrError> {
        debug!("Creating Solr core {}", name);
        let mut params = vec![
            ("name".to_string(), name.to_string()),
            ("action".to_string(), "CREATE".to_string()),
        ];
        if let Some(config_set) = config_set {
            params.push(("configSet".to_string(), config_set.to_string()));
        }
        self.action(params)?;
        Ok(())
    }

    /// Unload a core, without removing the data dir or index.
    pub fn unload(&self, core: &str) -> Result<(), SolrError> {
        debug!("Unloading Solr core {}", core);
        self.action(vec![
            ("core".to_string(), core.to_string()),
            ("action".to_string(), "UNLOAD".to_string()),
        ])?;
        Ok(())
    }

    /// Reload a core so schema changes take effect.
    pub fn reload(&self, core: &str) -> Result<(), SolrError> {
        debug!("Reloading Solr core {}", core);
        self.action(vec![
            ("core".to_string(), core.to_string()),
            ("action".to_string(), "RELOAD".to_string()),
        ])?;
        Ok(())
    }

    /// Get the status of all cores, or of one core.
    pub fn status(&self, core: Option<&str>) -> Result<CoreStatus, SolrError> {
        let mut params = Vec::new();
        if let Some(core) = core {
            params.push(("core".to_string(), core.to_string()));
        }
        let output = self.action(params)?;
        Ok(CoreStatus {
            init_failures: output.get("initFailures").cloned().unwrap_or(Value::Null),
            status: output.get("status").cloned().unwrap_or(Value::Null),
        })
    }

    /// Ping a core to check whether it is up.
    ///
    /// Returns false when the core does not exist (ping returns 404 in that
    /// case, which is expected here rather than a misconfiguration).
    pub fn ping(&self, core: &str) -> Result<bool, SolrError> {
        let ping_url = format!(
            "{}/{}/admin/ping",
            self.solr_url.trim_end_matches('/'),
            core
        );
        match self.requestor.send("admin", HttpRequest::get(ping_url)) {
            Ok(output) => Ok(output.get("status").and_then(Value::as_str) == Some("OK")),
            Err(SolrError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
