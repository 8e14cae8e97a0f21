//! Shared test harness: a recording mock transport.
//!
//! The mock records every request the client sends and replays scripted
//! responses, so suites can assert the exact URL/parameter set produced
//! for each operation without a running Solr.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use solr_kit::{HttpRequest, HttpResponse, SolrClient, SolrConfig, SolrError, Transport};

/// Minimal success body: a bare ok responseHeader.
pub const OK_BODY: &str = r#"{"responseHeader":{"status":0}}"#;

/// Empty select response body.
pub const EMPTY_SELECT_BODY: &str =
    r#"{"responseHeader":{"status":0},"response":{"numFound":0,"start":0,"docs":[]}}"#;

/// Transport that records requests and replays scripted responses.
///
/// Responses can be routed by URL substring (served to every matching
/// request) or queued in order. Routes are checked first; when neither
/// applies, requests get a 200 with [`OK_BODY`].
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
    routes: Mutex<Vec<(String, HttpResponse)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            routes: Mutex::new(Vec::new()),
        })
    }

    /// Queue a response to be returned for an upcoming request.
    pub fn push_response(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    /// Serve this response to every request whose URL contains `fragment`.
    pub fn route(&self, fragment: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().push((
            fragment.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        ));
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .expect("no requests recorded")
            .clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SolrError> {
        self.requests.lock().unwrap().push(request.clone());

        let routed = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment))
            .map(|(_, response)| response.clone());
        if let Some(response) = routed {
            return Ok(response);
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| HttpResponse {
                status: 200,
                body: OK_BODY.to_string(),
            }))
    }
}

/// Client over the given mock, for the standard test core.
pub fn client_with(transport: Arc<MockTransport>) -> SolrClient {
    SolrClient::with_transport(test_config(), transport).expect("client config is valid")
}

pub fn test_config() -> SolrConfig {
    SolrConfig {
        url: "http://localhost:8983/solr".into(),
        collection: "test".into(),
        ..Default::default()
    }
}

/// Form or query parameter value from a request, wherever it was carried.
pub fn param<'r>(request: &'r HttpRequest, key: &str) -> Option<&'r str> {
    request
        .form
        .iter()
        .chain(request.query.iter())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// All values for a repeated parameter.
pub fn param_all<'r>(request: &'r HttpRequest, key: &str) -> Vec<&'r str> {
    request
        .form
        .iter()
        .chain(request.query.iter())
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}
