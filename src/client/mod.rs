// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Solr HTTP client.
//!
//! [`SolrClient`] is the main entry point, aggregating the handler APIs
//! behind one shared transport:
//! - `client.query(...)` — the select handler
//! - `client.update` — the update handler (index / delete / commit)
//! - `client.schema` — the Schema API
//! - `client.core_admin` — the CoreAdmin API
//!
//! # Example
//!
//! ```rust,no_run
//! use solr_kit::{SolrClient, SolrConfig};
//!
//! # fn main() -> Result<(), solr_kit::SolrError> {
//! let config = SolrConfig {
//!     url: "http://localhost:8983/solr".into(),
//!     collection: "mycore".into(),
//!     ..Default::default()
//! };
//! let client = SolrClient::new(config)?;
//!
//! let response = client.query(&[("q".into(), "*:*".into())])?;
//! println!("{} documents", response.num_found());
//! # Ok(())
//! # }
//! ```

mod admin;
mod response;
mod schema_api;
mod update;

pub use admin::{CoreAdmin, CoreStatus};
pub use response::{FacetCounts, Group, Grouped, QueryResponse, RangeFacetCounts};
pub use schema_api::{CopyField, SchemaApi};
pub use update::{IndexOptions, Update};

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error};

use crate::config::SolrConfig;
use crate::error::SolrError;
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::metrics;
use crate::retry::{retry, RetryConfig};

/// Handler path for the select API
pub const SELECT_HANDLER: &str = "select";
/// Handler path for the update API
pub const UPDATE_HANDLER: &str = "update";
/// Handler path for the Schema API
pub const SCHEMA_HANDLER: &str = "schema";
/// Handler path for the CoreAdmin API
pub const CORE_ADMIN_HANDLER: &str = "admin/cores";

/// Join base url, collection, and handler into a full request URL,
/// tolerating trailing slashes on any piece.
pub fn build_url(solr_url: &str, collection: &str, handler: &str) -> String {
    let base = solr_url.trim_end_matches('/');
    let collection = collection.trim_matches('/');
    if collection.is_empty() {
        format!("{}/{}", base, handler)
    } else {
        format!("{}/{}/{}", base, collection, handler)
    }
}

/// Render a bool the way Solr query parameters expect it.
pub(crate) fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Shared request pipeline used by every handler API.
///
/// Appends `wt=json`, retries transient transport failures, logs each call
/// with its timing, and interprets statuses: 404 escalates as
/// [`SolrError::NotFound`], other non-200s as [`SolrError::Http`], and a
/// nonzero `responseHeader.status` inside a 200 as [`SolrError::SolrStatus`].
pub(crate) struct Requestor {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl Requestor {
    pub(crate) fn new(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    pub(crate) fn send(
        &self,
        handler: &'static str,
        mut request: HttpRequest,
    ) -> Result<Value, SolrError> {
        // wt=json rides with the rest of the parameters: in the form body
        // for form requests, in the query string otherwise.
        if request.form.is_empty() {
            request.query.push(("wt".into(), "json".into()));
        } else {
            request.form.push(("wt".into(), "json".into()));
        }

        let _timer = metrics::LatencyTimer::new(handler);
        let start = Instant::now();
        let result = retry(handler, &self.retry, || self.transport.execute(&request));

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                metrics::record_transport_error(handler);
                metrics::record_request(handler, "error");
                return Err(err);
            }
        };

        debug!(
            "{:?} {} => {}: {:?}",
            request.method,
            request.url,
            response.status,
            start.elapsed(),
        );

        if response.status == 404 {
            metrics::record_request(handler, "error");
            return Err(SolrError::NotFound {
                url: request.url.clone(),
            });
        }

        if response.status != 200 {
            error!(
                "{:?} {} => err: {}",
                request.method, request.url, response.body
            );
            metrics::record_request(handler, "error");
            return Err(SolrError::Http {
                status: response.status,
                body: response.body,
            });
        }

        let output: Value = serde_json::from_str(&response.body)?;

        // Solr may return 200 but pass along its own error code and message
        let header_status = output
            .pointer("/responseHeader/status")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if header_status != 0 {
            let message = output
                .pointer("/error/msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    output
                        .pointer("/responseHeader/errors")
                        .map(Value::to_string)
                        .unwrap_or_default()
                });
            error!(
                "{:?} {} => {}: {}",
                request.method, request.url, header_status, message
            );
            metrics::record_request(handler, "error");
            return Err(SolrError::SolrStatus {
                status: header_status,
                message,
            });
        }

        metrics::record_request(handler, "success");
        Ok(output)
    }
}

/// Client aggregating the Solr handler APIs over one shared transport.
pub struct SolrClient {
    config: SolrConfig,
    requestor: Arc<Requestor>,
    select_url: String,
    /// Update API handler
    pub update: Update,
    /// Schema API handler
    pub schema: SchemaApi,
    /// CoreAdmin API handler
    pub core_admin: CoreAdmin,
}

impl SolrClient {
    /// Build a client with the default [`UreqTransport`].
    pub fn new(config: SolrConfig) -> Result<Self, SolrError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        Self::with_transport(config, Arc::new(UreqTransport::new(timeout)))
    }

    /// Build a client over a caller-supplied transport (used by tests to
    /// substitute a recording mock).
    pub fn with_transport(
        config: SolrConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SolrError> {
        config.validate()?;
        let requestor = Arc::new(Requestor::new(transport, config.retry.clone()));

        let select_url = build_url(&config.url, &config.collection, SELECT_HANDLER);
        let update = Update::new(
            Arc::clone(&requestor),
            build_url(&config.url, &config.collection, UPDATE_HANDLER),
            config.commit_within_ms,
        );
        let schema = SchemaApi::new(
            Arc::clone(&requestor),
            build_url(&config.url, &config.collection, SCHEMA_HANDLER),
        );
        let core_admin = CoreAdmin::new(
            Arc::clone(&requestor),
            config.url.trim_end_matches('/').to_string(),
        );

        Ok(Self {
            config,
            requestor,
            select_url,
            update,
            schema,
            core_admin,
        })
    }

    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Perform a search with the given Solr parameters.
    ///
    /// Parameters are sent to the select handler via POST as
    /// `application/x-www-form-urlencoded`, so long filter lists don't
    /// overflow URL length limits.
    pub fn query(&self, params: &[(String, String)]) -> Result<QueryResponse, SolrError> {
        let request = HttpRequest::post(&self.select_url).with_form(params.to_vec());
        let output = match self.requestor.send("select", request) {
            Ok(output) => output,
            Err(err) => {
                metrics::record_query("error");
                return Err(err);
            }
        };
        let response = QueryResponse::from_json(output)?;
        metrics::record_query("success");
        metrics::record_query_results(response.docs.len());
        Ok(response)
    }
}
