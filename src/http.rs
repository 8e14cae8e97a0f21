//! HTTP transport types for the host-does-IO pattern.
//!
//! The client layer describes requests as plain data and interprets
//! responses; a [`Transport`] implementation performs the actual round-trip.
//! This keeps everything above the transport deterministic and lets tests
//! substitute a recording mock for the network.

use std::time::Duration;

use crate::error::SolrError;

/// HTTP method for a request. Solr's JSON APIs only need these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `query` pairs always go in the URL query string. `form` pairs are sent
/// as an `application/x-www-form-urlencoded` body (Solr's select handler
/// takes its parameters this way for efficiency). `body` is a JSON payload;
/// `form` and `body` are mutually exclusive by construction.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn with_form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.form = pairs;
        self
    }

    pub fn with_json_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes [`HttpRequest`]s. Implemented by [`UreqTransport`] for real
/// traffic and by mock transports in tests.
///
/// Implementations must return `Err` only for transport-level failures;
/// non-success HTTP statuses are returned as data so the client layer can
/// interpret them (and decide what counts as an error for each call).
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SolrError>;
}

/// Default [`Transport`] backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Build a transport with the given per-request timeout.
    ///
    /// Status-code-as-error is disabled so 4xx/5xx responses come back as
    /// data rather than `Err` and the client layer owns status handling.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SolrError> {
        let query = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()));

        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => self.agent.get(&request.url).query_pairs(query).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&request.url)
                .query_pairs(query)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) if !request.form.is_empty() => self
                .agent
                .post(&request.url)
                .query_pairs(query)
                .send_form(
                    request
                        .form
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str())),
                ),
            (HttpMethod::Post, None) => self
                .agent
                .post(&request.url)
                .query_pairs(query)
                .send_empty(),
        };

        let mut response = result.map_err(|err| SolrError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| SolrError::Transport(err.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
