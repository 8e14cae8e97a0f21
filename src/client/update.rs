//! API handler for Solr update functionality.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::Requestor;
use crate::error::SolrError;
use crate::http::HttpRequest;
use crate::metrics;

/// Options for an index call.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Perform a hard commit. Drops commitWithin as superfluous.
    pub commit: bool,
    /// Override the configured commitWithin window for this call.
    pub commit_within_ms: Option<u64>,
}

impl IndexOptions {
    /// Options requesting a hard commit.
    pub fn hard_commit() -> Self {
        Self {
            commit: true,
            commit_within_ms: None,
        }
    }
}

/// API handler for the update endpoint: indexing and deleting documents.
pub struct Update {
    requestor: Arc<Requestor>,
    url: String,
    commit_within_ms: u64,
}

impl Update {
    pub(crate) fn new(requestor: Arc<Requestor>, url: String, commit_within_ms: u64) -> Self {
        Self {
            requestor,
            url,
            commit_within_ms,
        }
    }

    fn commit_params(&self, options: &IndexOptions) -> Vec<(String, String)> {
        if options.commit {
            // hard commit requested, so commitWithin is superfluous
            vec![("commit".into(), "true".into())]
        } else {
            let window = options.commit_within_ms.unwrap_or(self.commit_within_ms);
            vec![("commitWithin".into(), window.to_string())]
        }
    }

    /// Index documents, by default with a soft commit inside the configured
    /// commitWithin window.
    pub fn index(&self, docs: &[Value], options: &IndexOptions) -> Result<(), SolrError> {
        let url = format!("{}/json/docs", self.url);
        let body = serde_json::to_string(docs)?;
        let request = HttpRequest::post(url)
            .with_query(self.commit_params(options))
            .with_json_body(body);
        self.requestor.send("update", request)?;
        metrics::record_indexed_items(docs.len());
        Ok(())
    }

    /// Pass a delete object to the update handler.
    fn delete(&self, del_obj: Value) -> Result<(), SolrError> {
        let body = serde_json::to_string(&json!({ "delete": del_obj }))?;
        let request = HttpRequest::post(&self.url)
            .with_query(self.commit_params(&IndexOptions::default()))
            .with_json_body(body);
        self.requestor.send("update", request)?;
        Ok(())
    }

    /// Delete documents by id field.
    pub fn delete_by_id(&self, ids: &[String]) -> Result<(), SolrError> {
        debug!("Deleting {} documents from index by id", ids.len());
        self.delete(json!(ids))?;
        metrics::record_removed_items(ids.len());
        Ok(())
    }

    /// Delete documents matching an arbitrary search query.
    pub fn delete_by_query(&self, query: &str) -> Result<(), SolrError> {
        debug!("Deleting documents from index matching {}", query);
        self.delete(json!({ "query": query }))
    }

    /// Perform a hard commit.
    pub fn commit(&self) -> Result<(), SolrError> {
        self.index(&[], &IndexOptions::hard_commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryConfig;

    fn update_handler() -> Update {
        use crate::http::{HttpResponse, Transport};

        struct NullTransport;
        impl Transport for NullTransport {
            fn execute(
                &self,
                _request: &HttpRequest,
            ) -> Result<HttpResponse, SolrError> {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"responseHeader":{"status":0}}"#.into(),
                })
            }
        }

        Update::new(
            Arc::new(Requestor::new(Arc::new(NullTransport), RetryConfig::none())),
            "http://localhost:8983/solr/test/update".into(),
            1000,
        )
    }

    #[test]
    fn soft_commit_uses_configured_window() {
        let update = update_handler();
        let params = update.commit_params(&IndexOptions::default());
        assert_eq!(params, vec![("commitWithin".to_string(), "1000".to_string())]);
    }

    #[test]
    fn commit_within_override() {
        let update = update_handler();
        let options = IndexOptions {
            commit: false,
            commit_within_ms: Some(50),
        };
        assert_eq!(
            update.commit_params(&options),
            vec![("commitWithin".to_string(), "50".to_string())]
        );
    }

    #[test]
    fn hard_commit_drops_commit_within() {
        let update = update_handler();
        let params = update.commit_params(&IndexOptions::hard_commit());
        assert_eq!(params, vec![("commit".to_string(), "true".to_string())]);
    }
}
